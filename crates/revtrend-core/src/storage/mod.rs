//! Persistence for extracted series: JSON documents, a SQLite history
//! store, and CSV export.

pub mod export;
pub mod json;
pub mod sqlite;

pub use export::write_csv;
pub use json::{from_json, load_json, save_json, to_json};
pub use sqlite::{ImportRecord, SeriesStore};
