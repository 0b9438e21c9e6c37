use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use crate::model::{RowKind, Segment};
use crate::profile::schema::ProfileDef;

/// A row label that maps to none of the known segments.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown segment label '{raw}' (normalized '{canonical}')")]
pub struct UnknownSegment {
    pub raw: String,
    pub canonical: String,
}

/// Map a row label to its canonical segment.
///
/// Accepts casing, underscore/space, British spelling and abbreviation
/// variants: "Data_Center ", "Data Centre" and "DATA CENTER:" all give
/// `Segment::DataCenter`.
pub fn normalize_label(raw: &str) -> Result<Segment, UnknownSegment> {
    let canonical = canonical_label(raw);
    SEGMENT_ALIASES
        .get(canonical.as_str())
        .copied()
        .ok_or_else(|| UnknownSegment {
            raw: raw.to_string(),
            canonical,
        })
}

/// Reduce a label to a lowercase underscore key.
///
/// Steps:
/// 1. Trim and drop trailing punctuation and footnote markers ("(1)", "*")
/// 2. Lowercase, "&" becomes "and"
/// 3. Every other non-alphanumeric character becomes an underscore
/// 4. Collapse repeated underscores and trim them from both ends
pub fn canonical_label(raw: &str) -> String {
    let mut s = raw.trim();

    loop {
        let before = s.len();
        s = s
            .trim_end_matches(|c: char| matches!(c, ':' | '.' | ',' | ';' | '*' | '†'))
            .trim_end();
        // Footnote reference like "(1)" or "(a)"
        if let Some(idx) = s.rfind('(') {
            let after = &s[idx..];
            if idx > 0 && after.len() >= 3 && after.len() <= 4 && after.ends_with(')') {
                let inner = &after[1..after.len() - 1];
                if inner.chars().all(|c| c.is_ascii_alphanumeric()) {
                    s = s[..idx].trim_end();
                }
            }
        }
        if s.len() == before {
            break;
        }
    }

    let lower = s.to_lowercase().replace('&', " and ");

    let mut normalized = String::with_capacity(lower.len());
    for c in lower.chars() {
        if c.is_alphanumeric() {
            normalized.push(c);
        } else {
            normalized.push('_');
        }
    }

    let mut result = String::with_capacity(normalized.len());
    let mut prev_underscore = true; // skips leading underscores
    for c in normalized.chars() {
        if c == '_' {
            if !prev_underscore {
                result.push('_');
            }
            prev_underscore = true;
        } else {
            result.push(c);
            prev_underscore = false;
        }
    }
    if result.ends_with('_') {
        result.pop();
    }

    result
}

/// Label lookup combining the built-in alias table with a profile's extra
/// segment aliases and total-row labels.
#[derive(Debug, Clone, Default)]
pub struct LabelMatcher {
    extra_aliases: HashMap<String, Segment>,
    extra_totals: HashSet<String>,
}

impl LabelMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_profile(profile: &ProfileDef) -> Self {
        let mut extra_aliases = HashMap::new();
        for (segment, aliases) in &profile.segment_aliases {
            for alias in aliases {
                extra_aliases.insert(canonical_label(alias), *segment);
            }
        }
        let extra_totals = profile
            .total_labels
            .iter()
            .map(|l| canonical_label(l))
            .collect();
        LabelMatcher {
            extra_aliases,
            extra_totals,
        }
    }

    /// Classify a row label as a segment row or the total row.
    pub fn classify(&self, raw: &str) -> Result<RowKind, UnknownSegment> {
        let canonical = canonical_label(raw);
        if TOTAL_LABELS.contains(canonical.as_str()) || self.extra_totals.contains(&canonical) {
            return Ok(RowKind::Total);
        }
        if let Some(segment) = self.extra_aliases.get(&canonical) {
            return Ok(RowKind::Segment(*segment));
        }
        SEGMENT_ALIASES
            .get(canonical.as_str())
            .map(|s| RowKind::Segment(*s))
            .ok_or_else(|| UnknownSegment {
                raw: raw.to_string(),
                canonical,
            })
    }

    pub fn is_known(&self, raw: &str) -> bool {
        self.classify(raw).is_ok()
    }
}

static TOTAL_LABELS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "total",
        "total_revenue",
        "total_revenues",
        "revenue",
        "revenues",
        "net_revenue",
        "total_net_revenue",
    ]
    .into_iter()
    .collect()
});

static SEGMENT_ALIASES: LazyLock<HashMap<&'static str, Segment>> = LazyLock::new(|| {
    let mut m = HashMap::new();

    m.insert("data_center", Segment::DataCenter);
    m.insert("datacenter", Segment::DataCenter);
    m.insert("data_centre", Segment::DataCenter);
    m.insert("datacentre", Segment::DataCenter);
    m.insert("dc", Segment::DataCenter);

    m.insert("gaming", Segment::Gaming);
    m.insert("gaming_and_ai_pc", Segment::Gaming);

    m.insert("professional_visualization", Segment::ProfessionalVisualization);
    m.insert("professional_visualisation", Segment::ProfessionalVisualization);
    m.insert("pro_visualization", Segment::ProfessionalVisualization);
    m.insert("pro_visualisation", Segment::ProfessionalVisualization);
    m.insert("pro_viz", Segment::ProfessionalVisualization);
    m.insert("proviz", Segment::ProfessionalVisualization);

    m.insert("automotive", Segment::Automotive);
    m.insert("auto", Segment::Automotive);
    m.insert("automotive_and_robotics", Segment::Automotive);

    m.insert("oem_and_other", Segment::OemAndOther);
    m.insert("oem_other", Segment::OemAndOther);
    m.insert("oem_and_others", Segment::OemAndOther);
    m.insert("oem", Segment::OemAndOther);
    m.insert("oem_and_ip", Segment::OemAndOther);

    m
});

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_underscore_and_trailing_space() {
        assert_eq!(normalize_label("Data_Center "), Ok(Segment::DataCenter));
    }

    #[test]
    fn test_british_spelling() {
        assert_eq!(normalize_label("Data Centre"), Ok(Segment::DataCenter));
        assert_eq!(
            normalize_label("Professional Visualisation"),
            Ok(Segment::ProfessionalVisualization)
        );
    }

    #[test]
    fn test_ampersand_and_punctuation() {
        assert_eq!(normalize_label("OEM & Other"), Ok(Segment::OemAndOther));
        assert_eq!(normalize_label("OEM and Other:"), Ok(Segment::OemAndOther));
        assert_eq!(normalize_label("Automotive (1)"), Ok(Segment::Automotive));
        assert_eq!(normalize_label("GAMING*"), Ok(Segment::Gaming));
    }

    #[test]
    fn test_abbreviations() {
        assert_eq!(normalize_label("Pro Viz"), Ok(Segment::ProfessionalVisualization));
        assert_eq!(normalize_label("Auto"), Ok(Segment::Automotive));
    }

    #[test]
    fn test_unknown_segment() {
        let err = normalize_label("Crypto Mining").unwrap_err();
        assert_eq!(err.raw, "Crypto Mining");
        assert_eq!(err.canonical, "crypto_mining");
    }

    #[test]
    fn test_canonical_label() {
        assert_eq!(canonical_label("  Revenue by Market  "), "revenue_by_market");
        assert_eq!(canonical_label("__Data--Center__"), "data_center");
        assert_eq!(canonical_label("Total revenue (a)"), "total_revenue");
    }

    #[test]
    fn test_matcher_total_row() {
        let matcher = LabelMatcher::new();
        assert_eq!(matcher.classify("Total"), Ok(RowKind::Total));
        assert_eq!(matcher.classify("Total revenue"), Ok(RowKind::Total));
        assert!(!matcher.is_known("Revenue by Market"));
    }

    #[test]
    fn test_matcher_profile_aliases() {
        let mut aliases = BTreeMap::new();
        aliases.insert(Segment::DataCenter, vec!["Compute".to_string()]);
        let profile = ProfileDef {
            segment_aliases: aliases,
            total_labels: vec!["Grand total".into()],
            ..ProfileDef::default()
        };
        let matcher = LabelMatcher::from_profile(&profile);
        assert_eq!(
            matcher.classify("compute"),
            Ok(RowKind::Segment(Segment::DataCenter))
        );
        assert_eq!(matcher.classify("Grand Total"), Ok(RowKind::Total));
        assert!(LabelMatcher::new().classify("Compute").is_err());
    }
}
