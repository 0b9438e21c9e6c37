use std::path::Path;

use crate::error::RevtrendError;
use crate::model::RevenueSeries;

/// Serialize a series as pretty-printed JSON. Amounts are decimal strings.
pub fn to_json(series: &RevenueSeries) -> Result<String, RevtrendError> {
    Ok(serde_json::to_string_pretty(series)?)
}

/// Parse a series, re-checking ordering and period uniqueness.
pub fn from_json(json: &str) -> Result<RevenueSeries, RevtrendError> {
    Ok(serde_json::from_str(json)?)
}

pub fn save_json(series: &RevenueSeries, path: &Path) -> Result<(), RevtrendError> {
    std::fs::write(path, to_json(series)?)?;
    tracing::debug!(path = %path.display(), records = series.len(), "saved series JSON");
    Ok(())
}

pub fn load_json(path: &Path) -> Result<RevenueSeries, RevtrendError> {
    let content = std::fs::read_to_string(path)?;
    from_json(&content)
}
