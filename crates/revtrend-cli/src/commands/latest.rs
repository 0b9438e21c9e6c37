use std::path::Path;

use revtrend_core::discovery::{latest_document, period_from_file_name};
use revtrend_core::error::RevtrendError;

pub fn run(dir: &Path) -> Result<(), RevtrendError> {
    let path = latest_document(dir)?;
    let period = path
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(period_from_file_name);
    match period {
        Some(p) => println!("{}\t{p}", path.display()),
        None => println!("{}", path.display()),
    }
    Ok(())
}
