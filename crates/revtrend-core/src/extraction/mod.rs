pub mod pdftotext;
pub mod table;
pub mod xlsx;

use std::path::Path;

use crate::error::RevtrendError;
use pdftotext::PdftotextExtractor;
use xlsx::XlsxExtractor;

/// Text content of a single page, one entry per layout line.
#[derive(Debug, Clone, PartialEq)]
pub struct PageContent {
    pub page_number: usize,
    pub lines: Vec<String>,
}

/// Trait for document text extraction backends.
pub trait DocumentExtractor: Send + Sync {
    /// Extract text from document bytes, returning one PageContent per page
    /// with column alignment preserved by spacing.
    fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<PageContent>, RevtrendError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// Pick a backend from the file extension: spreadsheets go through
/// calamine, everything else through pdftotext.
pub fn extractor_for_path(path: &Path) -> Box<dyn DocumentExtractor> {
    let is_xlsx = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("xlsx"))
        .unwrap_or(false);
    if is_xlsx {
        Box::new(XlsxExtractor::new())
    } else {
        Box::new(PdftotextExtractor::new())
    }
}
