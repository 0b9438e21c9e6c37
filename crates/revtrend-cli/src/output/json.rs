use revtrend_core::error::RevtrendError;
use serde::Serialize;

pub fn print<T: Serialize>(value: &T) -> Result<(), RevtrendError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}
