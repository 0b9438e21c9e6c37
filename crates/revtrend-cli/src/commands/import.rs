use std::path::Path;

use revtrend_core::discovery::list_documents;
use revtrend_core::error::RevtrendError;
use revtrend_core::storage::SeriesStore;

use super::resolve_profile;
use crate::ProfileArgs;

/// Import reports oldest first, so a later report's restated figures
/// replace earlier ones for the same quarter.
pub fn run(dir: &Path, profile: &ProfileArgs, db: &Path) -> Result<(), RevtrendError> {
    let profile = resolve_profile(profile)?;
    let documents = list_documents(dir)?;
    if documents.is_empty() {
        return Err(RevtrendError::NoDocuments(dir.to_path_buf()));
    }

    let mut store = SeriesStore::open(db)?;
    let mut imported = 0;
    let mut failed = 0;

    for (period, path) in &documents {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        match revtrend_core::extract_file(path, &profile) {
            Ok(extraction) => {
                let rows = store.save_series(&extraction.series, &name)?;
                imported += 1;
                eprintln!(
                    "  {name} ({period}): {rows} quarter(s), {} warning(s)",
                    extraction.warnings.len()
                );
            }
            Err(e) => {
                failed += 1;
                eprintln!("  {name} ({period}): skipped, {e}");
            }
        }
    }

    let total = store.load_series()?.len();
    eprintln!(
        "Imported {imported} of {} report(s) into {} ({total} quarter(s) stored)",
        documents.len(),
        db.display()
    );
    if imported == 0 && failed > 0 {
        return Err(RevtrendError::Extraction(format!(
            "none of the {failed} report(s) in {} could be imported",
            dir.display()
        )));
    }
    Ok(())
}
