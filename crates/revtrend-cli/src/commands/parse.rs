use std::path::PathBuf;

use revtrend_core::error::RevtrendError;
use revtrend_core::storage::save_json;

use super::resolve_profile;
use crate::output;
use crate::ProfileArgs;

pub fn run(
    input_file: PathBuf,
    profile: &ProfileArgs,
    output_format: &str,
    output_file: Option<PathBuf>,
) -> Result<(), RevtrendError> {
    let profile = resolve_profile(profile)?;
    let extraction = revtrend_core::extract_file(&input_file, &profile)?;

    match output_file {
        Some(path) => {
            // The file always holds the plain series so `growth` can read it back.
            save_json(&extraction.series, &path)?;
            eprintln!(
                "Extracted {} quarter(s), written to {}",
                extraction.series.len(),
                path.display()
            );
            for w in &extraction.warnings {
                eprintln!("  warning: {w}");
            }
        }
        None => match output_format {
            "json" => output::json::print(&extraction)?,
            _ => output::table::print_extraction(&extraction),
        },
    }

    Ok(())
}
