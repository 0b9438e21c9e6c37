use regex::Regex;
use std::sync::LazyLock;

use crate::model::FiscalPeriod;

// Q4 FY25, Q4FY2025, Q4'25, FY25 Q4, 4Q25
const PERIOD_PATTERN: &str = r"(?:Q([1-4])\s*(?:FY\s*'?|')?(\d{4}|\d{2})|FY\s*'?(\d{4}|\d{2})\s*Q([1-4])|([1-4])Q\s*(?:FY\s*)?'?(\d{4}|\d{2}))";

static PERIOD_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\b{PERIOD_PATTERN}\b")).expect("period token regex is valid")
});

static PERIOD_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)^{PERIOD_PATTERN}$")).expect("period label regex is valid")
});

static QUARTER_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bQ([1-4])\b").expect("quarter regex is valid"));

static FISCAL_YEAR_ONLY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bFY\s*'?(\d{4}|\d{2})\b").expect("fiscal year regex is valid")
});

/// A period label found in a line of layout text, with its character span.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodToken {
    pub period: FiscalPeriod,
    pub start: usize,
    pub end: usize,
}

/// Parse a whole cell as a fiscal quarter label.
pub fn parse_period_label(raw: &str) -> Option<FiscalPeriod> {
    let caps = PERIOD_LABEL.captures(raw.trim())?;
    period_from_captures(&caps)
}

/// Find every period label in a line, in reading order.
pub fn find_period_tokens(line: &str) -> Vec<PeriodToken> {
    PERIOD_TOKEN
        .captures_iter(line)
        .filter_map(|caps| {
            let m = caps.get(0)?;
            let period = period_from_captures(&caps)?;
            Some(PeriodToken {
                period,
                start: char_offset(line, m.start()),
                end: char_offset(line, m.end()),
            })
        })
        .collect()
}

/// Bare quarter markers ("Q4") with their character spans, for headers
/// that put the fiscal year on the following line.
pub fn find_quarter_tokens(line: &str) -> Vec<(u8, usize, usize)> {
    QUARTER_ONLY
        .captures_iter(line)
        .filter_map(|caps| {
            let m = caps.get(0)?;
            let quarter = caps.get(1)?.as_str().parse().ok()?;
            Some((quarter, char_offset(line, m.start()), char_offset(line, m.end())))
        })
        .collect()
}

/// Bare fiscal year markers ("FY25") with their character spans.
pub fn find_fiscal_year_tokens(line: &str) -> Vec<(i32, usize, usize)> {
    FISCAL_YEAR_ONLY
        .captures_iter(line)
        .filter_map(|caps| {
            let m = caps.get(0)?;
            let year = expand_year(caps.get(1)?.as_str())?;
            Some((year, char_offset(line, m.start()), char_offset(line, m.end())))
        })
        .collect()
}

fn period_from_captures(caps: &regex::Captures<'_>) -> Option<FiscalPeriod> {
    let (quarter, year) = if let (Some(q), Some(y)) = (caps.get(1), caps.get(2)) {
        (q, y)
    } else if let (Some(y), Some(q)) = (caps.get(3), caps.get(4)) {
        (q, y)
    } else {
        (caps.get(5)?, caps.get(6)?)
    };
    let quarter: u8 = quarter.as_str().parse().ok()?;
    let year = expand_year(year.as_str())?;
    FiscalPeriod::new(year, quarter).ok()
}

/// Two-digit years are read as 20xx.
fn expand_year(digits: &str) -> Option<i32> {
    let n: i32 = digits.parse().ok()?;
    match digits.len() {
        2 => Some(2000 + n),
        4 => Some(n),
        _ => None,
    }
}

fn char_offset(line: &str, byte_index: usize) -> usize {
    line[..byte_index].chars().count()
}
