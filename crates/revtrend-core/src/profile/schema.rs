use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::{ReportingUnit, Segment};

/// Settings for the table locator and record extractor.
///
/// Everything except the identification fields has a default, so a profile
/// file only needs to state what differs from the generic behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileDef {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Base unit assumed when the document states none.
    #[serde(default)]
    pub default_unit: ReportingUnit,
    /// Allowed disagreement between a reported total and its segment sum,
    /// in base units (decimal string).
    #[serde(default = "default_tolerance")]
    pub tolerance: Decimal,
    #[serde(default = "default_min_period_columns")]
    pub min_period_columns: usize,
    #[serde(default = "default_min_segment_rows")]
    pub min_segment_rows: usize,
    /// Consecutive non-matching, non-blank rows that end a table.
    #[serde(default = "default_max_unmatched_run")]
    pub max_unmatched_run: usize,
    /// Extra label variants per segment, on top of the built-in aliases.
    #[serde(default)]
    pub segment_aliases: BTreeMap<Segment, Vec<String>>,
    /// Extra labels designating the total row.
    #[serde(default)]
    pub total_labels: Vec<String>,
}

fn default_tolerance() -> Decimal {
    Decimal::ONE
}

fn default_min_period_columns() -> usize {
    2
}

fn default_min_segment_rows() -> usize {
    1
}

fn default_max_unmatched_run() -> usize {
    3
}

impl Default for ProfileDef {
    fn default() -> Self {
        ProfileDef {
            name: "generic".into(),
            version: "1".into(),
            description: None,
            default_unit: ReportingUnit::default(),
            tolerance: default_tolerance(),
            min_period_columns: default_min_period_columns(),
            min_segment_rows: default_min_segment_rows(),
            max_unmatched_run: default_max_unmatched_run(),
            segment_aliases: BTreeMap::new(),
            total_labels: Vec::new(),
        }
    }
}
