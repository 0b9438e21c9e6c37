//! Locating quarterly revenue documents by file name.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::error::RevtrendError;
use crate::model::FiscalPeriod;
use crate::parsing::period::find_period_tokens;

/// Compact quarter code as in "Rev_by_Mkt_Qtrly_Trend_Q226.pdf".
static COMPACT_QUARTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Q([1-4])(\d{2})(?:\D|$)").expect("file name regex is valid"));

const DOCUMENT_EXTENSIONS: &[&str] = &["pdf", "xlsx"];

/// Read the fiscal period a document covers from its file name.
///
/// "Rev_by_Mkt_Qtrly_Trend_Q226.pdf" gives Q2 FY26. Spelled-out labels
/// such as "revenue_Q4_FY25.xlsx" are accepted as well.
pub fn period_from_file_name(name: &str) -> Option<FiscalPeriod> {
    if let Some(caps) = COMPACT_QUARTER.captures(name) {
        let quarter: u8 = caps[1].parse().ok()?;
        let year: i32 = caps[2].parse().ok()?;
        return FiscalPeriod::new(2000 + year, quarter).ok();
    }
    let spaced = name.replace(['_', '-', '.'], " ");
    find_period_tokens(&spaced).first().map(|t| t.period)
}

/// Every document in `dir` with a recognizable period, oldest first.
pub fn list_documents(dir: &Path) -> Result<Vec<(FiscalPeriod, PathBuf)>, RevtrendError> {
    let mut documents = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_document = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| DOCUMENT_EXTENSIONS.iter().any(|x| e.eq_ignore_ascii_case(x)));
        if !is_document || !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        match period_from_file_name(name) {
            Some(period) => documents.push((period, path)),
            None => debug!(file = name, "no fiscal period in file name; skipped"),
        }
    }
    documents.sort();
    Ok(documents)
}

/// The document in `dir` covering the latest fiscal period.
pub fn latest_document(dir: &Path) -> Result<PathBuf, RevtrendError> {
    list_documents(dir)?
        .pop()
        .map(|(_, path)| path)
        .ok_or_else(|| RevtrendError::NoDocuments(dir.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(year: i32, quarter: u8) -> FiscalPeriod {
        FiscalPeriod::new(year, quarter).unwrap()
    }

    #[test]
    fn test_compact_code() {
        assert_eq!(
            period_from_file_name("Rev_by_Mkt_Qtrly_Trend_Q226.pdf"),
            Some(q(2026, 2))
        );
        assert_eq!(
            period_from_file_name("Rev_by_Mkt_Qtrly_Trend_Q425.pdf"),
            Some(q(2025, 4))
        );
        assert_eq!(period_from_file_name("Q124"), Some(q(2024, 1)));
    }

    #[test]
    fn test_spelled_out_label() {
        assert_eq!(period_from_file_name("revenue_Q4_FY25.xlsx"), Some(q(2025, 4)));
    }

    #[test]
    fn test_no_period() {
        assert_eq!(period_from_file_name("invalid_file.pdf"), None);
    }

    #[test]
    fn test_latest_document_orders_by_period() {
        let dir = tempfile::tempdir().unwrap();
        for name in [
            "Rev_by_Mkt_Qtrly_Trend_Q425.pdf",
            "Rev_by_Mkt_Qtrly_Trend_Q226.pdf",
            "Rev_by_Mkt_Qtrly_Trend_Q124.pdf",
            "notes.txt",
            "README.pdf",
        ] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        let latest = latest_document(dir.path()).unwrap();
        assert_eq!(
            latest.file_name().unwrap(),
            "Rev_by_Mkt_Qtrly_Trend_Q226.pdf"
        );
        assert_eq!(list_documents(dir.path()).unwrap().len(), 3);
    }

    #[test]
    fn test_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = latest_document(dir.path()).unwrap_err();
        assert!(matches!(err, RevtrendError::NoDocuments(_)));
    }
}
