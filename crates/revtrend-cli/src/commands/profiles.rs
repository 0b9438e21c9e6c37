use std::path::Path;

use revtrend_core::error::RevtrendError;
use revtrend_core::profile::{builtin, load_profile};

pub fn list() -> Result<(), RevtrendError> {
    println!("Available predefined profiles:\n");
    for name in builtin::PRESETS {
        let profile = builtin::load_preset(name)?;
        println!("  {:<8} {} (v{})", name, profile.name, profile.version);
        if let Some(ref desc) = profile.description {
            println!("           {}", desc);
        }
        println!(
            "           unit {}, tolerance {}, {} extra alias(es)",
            profile.default_unit,
            profile.tolerance,
            profile.segment_aliases.values().map(Vec::len).sum::<usize>()
        );
        println!();
    }
    Ok(())
}

pub fn show(name: &str) -> Result<(), RevtrendError> {
    let profile = builtin::load_preset(name)?;
    println!("{}", serde_json::to_string_pretty(&profile)?);
    Ok(())
}

pub fn validate(file: &Path) -> Result<(), RevtrendError> {
    let profile = load_profile(file)?;
    println!(
        "Valid profile: {} (v{}), {} segment alias group(s), {} total label(s)",
        profile.name,
        profile.version,
        profile.segment_aliases.len(),
        profile.total_labels.len()
    );
    Ok(())
}
