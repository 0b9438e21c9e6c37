use rust_decimal::Decimal;
use std::str::FromStr;

use crate::model::ReportingUnit;

/// A cell that does not hold an amount. Expected for header and label cells.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("not a numeric amount: '{raw}'")]
pub struct NotNumeric {
    pub raw: String,
}

/// Parse an amount cell into a decimal.
///
/// Handles formats like:
/// - "35,580" -> 35580
/// - "$ 1,234.5" -> 1234.5
/// - "(1,234.5)" -> -1234.5 (accounting negative)
/// - "$(1,234.5)M" -> -1234500000
/// - "2.4 billion" -> 2400000000
///
/// Without a unit suffix the number is returned as written, i.e. in the
/// document's base unit.
pub fn normalize_amount(raw: &str) -> Result<Decimal, NotNumeric> {
    normalize_scaled(raw, Decimal::ONE)
}

/// Like [`normalize_amount`], but unsuffixed numbers are scaled by `unit`,
/// so every result is an absolute currency amount.
pub fn normalize_amount_in(raw: &str, unit: ReportingUnit) -> Result<Decimal, NotNumeric> {
    normalize_scaled(raw, unit.multiplier())
}

fn normalize_scaled(raw: &str, base: Decimal) -> Result<Decimal, NotNumeric> {
    let not_numeric = || NotNumeric {
        raw: raw.to_string(),
    };

    let mut s = strip_currency(raw);
    let mut negative = false;
    let mut multiplier = None;

    if let Some((rest, m)) = split_unit_suffix(s) {
        s = strip_currency(rest);
        multiplier = Some(m);
    }

    if let Some(inner) = s.strip_prefix('(').and_then(|r| r.strip_suffix(')')) {
        negative = true;
        s = strip_currency(inner);
        if multiplier.is_none() {
            if let Some((rest, m)) = split_unit_suffix(s) {
                s = strip_currency(rest);
                multiplier = Some(m);
            }
        }
    }

    if let Some(rest) = s.strip_prefix(|c: char| c == '-' || c == '\u{2212}') {
        negative = !negative;
        s = strip_currency(rest);
    }

    let digits: String = s.chars().filter(|c| !is_thousands_separator(*c)).collect();
    if !is_plain_decimal(&digits) {
        return Err(not_numeric());
    }

    let value = Decimal::from_str(&digits).map_err(|_| not_numeric())?;
    let scaled = value
        .checked_mul(multiplier.unwrap_or(base))
        .ok_or_else(not_numeric)?;

    let signed = if negative { -scaled } else { scaled };
    Ok(signed.normalize())
}

/// Trim whitespace and any leading or trailing currency marker.
fn strip_currency(s: &str) -> &str {
    let mut s = s.trim();
    loop {
        let before = s.len();
        for symbol in ["US$", "USD", "$", "€", "£", "¥"] {
            if let Some(rest) = s.strip_prefix(symbol) {
                s = rest.trim_start();
            }
            if let Some(rest) = s.strip_suffix(symbol) {
                s = rest.trim_end();
            }
        }
        if s.len() == before {
            return s;
        }
    }
}

/// Split a trailing scale word ("M", "bn", "million") off a number.
fn split_unit_suffix(s: &str) -> Option<(&str, Decimal)> {
    let body = s.trim_end_matches(|c: char| c.is_alphabetic());
    let suffix = &s[body.len()..];
    let body = body.trim_end();
    if suffix.is_empty() || body.is_empty() {
        return None;
    }
    if !body.ends_with(|c: char| c.is_ascii_digit() || c == ')' || c == '.') {
        return None;
    }

    let multiplier = match suffix.to_lowercase().as_str() {
        "k" | "thousand" | "thousands" => Decimal::from(1_000),
        "m" | "mm" | "mn" | "mil" | "million" | "millions" => Decimal::from(1_000_000),
        "b" | "bn" | "billion" | "billions" => Decimal::from(1_000_000_000),
        "t" | "tn" | "trillion" | "trillions" => Decimal::from(1_000_000_000_000_i64),
        _ => return None,
    };
    Some((body, multiplier))
}

fn is_thousands_separator(c: char) -> bool {
    matches!(c, ',' | '\u{a0}' | '\u{202f}')
}

fn is_plain_decimal(s: &str) -> bool {
    let mut dots = 0;
    let mut digits = 0;
    for c in s.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' => dots += 1,
            _ => return false,
        }
    }
    digits > 0 && dots <= 1
}
