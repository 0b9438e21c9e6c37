pub mod diagnostics;
pub mod discovery;
pub mod error;
pub mod extraction;
pub mod growth;
pub mod model;
pub mod parsing;
pub mod profile;
pub mod storage;

use std::path::Path;

use diagnostics::log_warnings;
use error::RevtrendError;
use extraction::{extractor_for_path, DocumentExtractor, PageContent};
use parsing::Extraction;
use profile::schema::ProfileDef;

/// Main API entry point: extract the quarterly revenue series from a document.
///
/// Runs the text backend, locates the segment revenue table and reads one
/// record per period column. Recoverable issues come back as warnings on
/// the result; a missing table or an empty table is an error.
pub fn extract_document(
    bytes: &[u8],
    extractor: &dyn DocumentExtractor,
    profile: &ProfileDef,
) -> Result<Extraction, RevtrendError> {
    let pages = extractor.extract_pages(bytes)?;
    tracing::debug!(
        backend = extractor.backend_name(),
        pages = pages.len(),
        "document text extracted"
    );
    extract_pages(&pages, profile)
}

/// Same as [`extract_document`] for text that has already been extracted.
pub fn extract_pages(
    pages: &[PageContent],
    profile: &ProfileDef,
) -> Result<Extraction, RevtrendError> {
    if pages.iter().all(|p| p.lines.iter().all(|l| l.trim().is_empty())) {
        return Err(RevtrendError::Extraction(
            "no text content found in document".into(),
        ));
    }

    let region = extraction::table::locate_table(pages, profile)?;
    let extraction = parsing::extract(&region, profile)?;
    log_warnings(&extraction.warnings);
    Ok(extraction)
}

/// Read a document from disk, picking the backend from its extension.
pub fn extract_file(path: &Path, profile: &ProfileDef) -> Result<Extraction, RevtrendError> {
    let bytes = std::fs::read(path)?;
    let extractor = extractor_for_path(path);
    extract_document(&bytes, extractor.as_ref(), profile)
}
