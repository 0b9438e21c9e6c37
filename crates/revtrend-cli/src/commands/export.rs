use std::fs::File;
use std::path::{Path, PathBuf};

use revtrend_core::error::RevtrendError;
use revtrend_core::storage::{save_json, write_csv, SeriesStore};

use crate::output;

pub fn run(
    db: &Path,
    csv: Option<PathBuf>,
    json: Option<PathBuf>,
    latest: Option<usize>,
) -> Result<(), RevtrendError> {
    if !db.exists() {
        return Err(RevtrendError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("database {} does not exist; run `revtrend import` first", db.display()),
        )));
    }

    let store = SeriesStore::open(db)?;
    let series = match latest {
        Some(n) => store.load_latest(n)?,
        None => store.load_series()?,
    };

    if let Some(path) = &csv {
        write_csv(&series, File::create(path)?)?;
        eprintln!("Wrote {} quarter(s) to {}", series.len(), path.display());
    }
    if let Some(path) = &json {
        save_json(&series, path)?;
        eprintln!("Wrote {} quarter(s) to {}", series.len(), path.display());
    }
    if csv.is_none() && json.is_none() {
        output::table::print_series(&series);
        output::table::print_imports(&store.import_history()?);
    }
    Ok(())
}
