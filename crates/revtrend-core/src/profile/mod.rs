pub mod builtin;
pub mod schema;

use std::collections::HashMap;
use std::path::Path;

use crate::error::RevtrendError;
use crate::parsing::normalize::canonical_label;
use schema::ProfileDef;

/// Load an extraction profile from a JSON file.
pub fn load_profile(path: &Path) -> Result<ProfileDef, RevtrendError> {
    let content = std::fs::read_to_string(path).map_err(|e| RevtrendError::ProfileLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_profile(&content, path)
}

/// Parse a profile from a JSON string, naming `source` in errors.
pub fn parse_profile(json: &str, source: &Path) -> Result<ProfileDef, RevtrendError> {
    let profile: ProfileDef = serde_json::from_str(json).map_err(|e| RevtrendError::ProfileLoad {
        path: source.to_path_buf(),
        reason: e.to_string(),
    })?;
    validate_profile(&profile)?;
    Ok(profile)
}

/// Parse a profile from a JSON string (no file path context).
pub fn parse_profile_str(json: &str) -> Result<ProfileDef, RevtrendError> {
    let profile: ProfileDef = serde_json::from_str(json)?;
    validate_profile(&profile)?;
    Ok(profile)
}

/// Check that a profile is well-formed.
pub fn validate_profile(profile: &ProfileDef) -> Result<(), RevtrendError> {
    if profile.name.trim().is_empty() {
        return Err(RevtrendError::ProfileInvalid("name must not be empty".into()));
    }

    for (field, value) in [
        ("min_period_columns", profile.min_period_columns),
        ("min_segment_rows", profile.min_segment_rows),
        ("max_unmatched_run", profile.max_unmatched_run),
    ] {
        if value == 0 {
            return Err(RevtrendError::ProfileInvalid(format!(
                "{field} must be at least 1"
            )));
        }
    }

    if profile.tolerance.is_sign_negative() {
        return Err(RevtrendError::ProfileInvalid(format!(
            "tolerance must not be negative (got {})",
            profile.tolerance
        )));
    }

    let totals: Vec<String> = profile.total_labels.iter().map(|l| canonical_label(l)).collect();
    if let Some(label) = profile.total_labels.iter().find(|l| canonical_label(l).is_empty()) {
        return Err(RevtrendError::ProfileInvalid(format!(
            "total label '{label}' is empty after normalization"
        )));
    }

    let mut owners = HashMap::new();
    for (segment, aliases) in &profile.segment_aliases {
        for alias in aliases {
            let key = canonical_label(alias);
            if key.is_empty() {
                return Err(RevtrendError::ProfileInvalid(format!(
                    "segment '{}' has an empty alias",
                    segment.key()
                )));
            }
            if totals.contains(&key) {
                return Err(RevtrendError::ProfileInvalid(format!(
                    "alias '{alias}' is also listed as a total label"
                )));
            }
            if let Some(other) = owners.insert(key, *segment) {
                if other != *segment {
                    return Err(RevtrendError::ProfileInvalid(format!(
                        "alias '{alias}' is assigned to both '{}' and '{}'",
                        other.key(),
                        segment.key()
                    )));
                }
            }
        }
    }

    Ok(())
}
