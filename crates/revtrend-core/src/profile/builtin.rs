use crate::error::RevtrendError;
use crate::profile::schema::ProfileDef;
use crate::profile::validate_profile;

const NVIDIA_JSON: &str = include_str!("../../../../profiles/nvidia.json");

/// Available predefined profiles.
pub const PRESETS: &[&str] = &["nvidia", "generic"];

/// Load a predefined profile by name.
pub fn load_preset(name: &str) -> Result<ProfileDef, RevtrendError> {
    match name {
        "nvidia" => {
            let profile: ProfileDef = serde_json::from_str(NVIDIA_JSON)?;
            validate_profile(&profile)?;
            Ok(profile)
        }
        "generic" => Ok(ProfileDef::default()),
        _ => Err(RevtrendError::ProfileInvalid(format!(
            "unknown preset '{}'. Available: {}",
            name,
            PRESETS.join(", ")
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Segment;

    #[test]
    fn test_load_nvidia_preset() {
        let profile = load_preset("nvidia").unwrap();
        assert_eq!(profile.name, "nvidia");
        assert!(profile.segment_aliases.contains_key(&Segment::DataCenter));
    }

    #[test]
    fn test_every_preset_loads() {
        for name in PRESETS {
            assert!(load_preset(name).is_ok(), "preset {name}");
        }
    }

    #[test]
    fn test_unknown_preset() {
        assert!(load_preset("xyz").is_err());
    }
}
