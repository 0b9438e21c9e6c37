use std::path::PathBuf;

use crate::model::FiscalPeriod;

#[derive(Debug, thiserror::Error)]
pub enum RevtrendError {
    #[error("document extraction failed: {0}")]
    Extraction(String),

    #[error("pdftotext not found. Install poppler: brew install poppler (macOS) or apt install poppler-utils (Linux)")]
    PdftotextNotFound,

    #[error("pdftotext failed with exit code {code}: {stderr}")]
    PdftotextFailed { code: i32, stderr: String },

    #[error("failed to read spreadsheet: {0}")]
    Spreadsheet(String),

    #[error("revenue table not found: {0}")]
    TableNotFound(String),

    #[error("no quarterly records could be extracted: {0}")]
    EmptyExtraction(String),

    #[error("invalid fiscal period: {0}")]
    InvalidPeriod(String),

    #[error("invalid revenue series: {0}")]
    InvalidSeries(String),

    #[error("baseline period {0} is not present in the series")]
    MissingBaseline(FiscalPeriod),

    #[error("failed to load profile from {path}: {reason}")]
    ProfileLoad { path: PathBuf, reason: String },

    #[error("invalid profile: {0}")]
    ProfileInvalid(String),

    #[error("no revenue documents found in {0}")]
    NoDocuments(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
