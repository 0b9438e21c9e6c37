use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::FiscalPeriod;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// A row carrying amounts whose label maps to no segment.
    UnknownSegment,
    /// A matched row whose cell holds no readable amount.
    NotNumeric,
    /// A reported total disagrees with its segments, or a row repeats.
    ExtractionMismatch,
    DuplicatePeriod,
    /// A period column with nothing readable in it.
    EmptyPeriod,
    NegativeAmount,
    /// A cell that could not be placed under a single period column.
    AmbiguousCell,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WarningKind::UnknownSegment => "unknown_segment",
            WarningKind::NotNumeric => "not_numeric",
            WarningKind::ExtractionMismatch => "extraction_mismatch",
            WarningKind::DuplicatePeriod => "duplicate_period",
            WarningKind::EmptyPeriod => "empty_period",
            WarningKind::NegativeAmount => "negative_amount",
            WarningKind::AmbiguousCell => "ambiguous_cell",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// The affected record is flagged and may not be trustworthy.
    Important,
    Info,
}

impl WarningKind {
    pub fn severity(&self) -> Severity {
        match self {
            WarningKind::NotNumeric
            | WarningKind::ExtractionMismatch
            | WarningKind::NegativeAmount
            | WarningKind::AmbiguousCell => Severity::Important,
            WarningKind::UnknownSegment
            | WarningKind::DuplicatePeriod
            | WarningKind::EmptyPeriod => Severity::Info,
        }
    }
}

/// Where in the document a warning originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub page_number: usize,
    pub line_index: usize,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "page {}, line {}", self.page_number, self.line_index + 1)
    }
}

/// A recoverable issue found while extracting. Accumulated alongside the
/// successful result rather than aborting the scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionWarning {
    pub kind: WarningKind,
    pub severity: Severity,
    pub location: SourceLocation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<FiscalPeriod>,
    pub message: String,
}

impl ExtractionWarning {
    pub fn new(kind: WarningKind, location: SourceLocation, message: impl Into<String>) -> Self {
        ExtractionWarning {
            kind,
            severity: kind.severity(),
            location,
            period: None,
            message: message.into(),
        }
    }

    pub fn for_period(mut self, period: FiscalPeriod) -> Self {
        self.period = Some(period);
        self
    }
}

impl fmt::Display for ExtractionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.period {
            Some(p) => write!(f, "[{}] {} ({}, {})", self.kind, self.message, p, self.location),
            None => write!(f, "[{}] {} ({})", self.kind, self.message, self.location),
        }
    }
}

/// Emit each warning through `tracing`.
pub fn log_warnings(warnings: &[ExtractionWarning]) {
    for w in warnings {
        match w.severity {
            Severity::Important => tracing::warn!(kind = %w.kind, "{w}"),
            Severity::Info => tracing::info!(kind = %w.kind, "{w}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_follows_kind() {
        let loc = SourceLocation {
            page_number: 1,
            line_index: 4,
        };
        let w = ExtractionWarning::new(WarningKind::ExtractionMismatch, loc, "total differs");
        assert_eq!(w.severity, Severity::Important);
        let w = ExtractionWarning::new(WarningKind::UnknownSegment, loc, "skipped row");
        assert_eq!(w.severity, Severity::Info);
    }

    #[test]
    fn test_display_includes_period_and_location() {
        let loc = SourceLocation {
            page_number: 2,
            line_index: 0,
        };
        let period = FiscalPeriod::new(2025, 3).unwrap();
        let w = ExtractionWarning::new(WarningKind::NotNumeric, loc, "Gaming cell 'n/a'")
            .for_period(period);
        assert_eq!(
            w.to_string(),
            "[not_numeric] Gaming cell 'n/a' (Q3 FY25, page 2, line 1)"
        );
    }

    #[test]
    fn test_serializes_snake_case_kind() {
        let loc = SourceLocation {
            page_number: 1,
            line_index: 0,
        };
        let w = ExtractionWarning::new(WarningKind::AmbiguousCell, loc, "x");
        let json = serde_json::to_value(&w).unwrap();
        assert_eq!(json["kind"], "ambiguous_cell");
        assert!(json.get("period").is_none());
    }
}
