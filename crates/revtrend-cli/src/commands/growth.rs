use std::path::{Path, PathBuf};

use revtrend_core::error::RevtrendError;
use revtrend_core::growth::analyze;
use revtrend_core::model::{FiscalPeriod, RevenueSeries};
use revtrend_core::storage::load_json;

use super::resolve_profile;
use crate::output;
use crate::ProfileArgs;

pub fn run(
    input_file: PathBuf,
    profile: &ProfileArgs,
    baseline: Option<&str>,
    output_format: &str,
) -> Result<(), RevtrendError> {
    let series = load_input(&input_file, profile)?;
    let baseline = baseline
        .map(|raw| raw.parse::<FiscalPeriod>())
        .transpose()?;
    let report = analyze(&series, baseline)?;

    match output_format {
        "json" => output::json::print(&report)?,
        _ => output::table::print_growth(&report),
    }
    Ok(())
}

/// A `.json` input is a saved series; anything else is a report to extract.
fn load_input(path: &Path, profile: &ProfileArgs) -> Result<RevenueSeries, RevtrendError> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        return load_json(path);
    }
    let profile = resolve_profile(profile)?;
    Ok(revtrend_core::extract_file(path, &profile)?.series)
}
