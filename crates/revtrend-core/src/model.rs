use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::RevtrendError;
use crate::parsing::period::parse_period_label;

/// One fiscal quarter. Ordered by (year, quarter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "PeriodRepr", into = "PeriodRepr")]
pub struct FiscalPeriod {
    year: i32,
    quarter: u8,
}

#[derive(Serialize, Deserialize)]
struct PeriodRepr {
    fiscal_year: i32,
    quarter: u8,
}

impl TryFrom<PeriodRepr> for FiscalPeriod {
    type Error = RevtrendError;

    fn try_from(repr: PeriodRepr) -> Result<Self, Self::Error> {
        FiscalPeriod::new(repr.fiscal_year, repr.quarter)
    }
}

impl From<FiscalPeriod> for PeriodRepr {
    fn from(p: FiscalPeriod) -> Self {
        PeriodRepr {
            fiscal_year: p.year,
            quarter: p.quarter,
        }
    }
}

impl FiscalPeriod {
    pub fn new(year: i32, quarter: u8) -> Result<Self, RevtrendError> {
        if !(1..=4).contains(&quarter) {
            return Err(RevtrendError::InvalidPeriod(format!(
                "quarter must be 1-4, got {quarter} (fiscal year {year})"
            )));
        }
        Ok(FiscalPeriod { year, quarter })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn quarter(&self) -> u8 {
        self.quarter
    }

    /// Absolute quarter index, used for arithmetic across year boundaries.
    fn ordinal(&self) -> i64 {
        i64::from(self.year) * 4 + i64::from(self.quarter - 1)
    }

    fn from_ordinal(ordinal: i64) -> FiscalPeriod {
        FiscalPeriod {
            year: ordinal.div_euclid(4) as i32,
            quarter: (ordinal.rem_euclid(4) + 1) as u8,
        }
    }

    /// The period `quarters` quarters later (or earlier, when negative).
    pub fn offset(&self, quarters: i64) -> FiscalPeriod {
        FiscalPeriod::from_ordinal(self.ordinal() + quarters)
    }

    pub fn next(&self) -> FiscalPeriod {
        self.offset(1)
    }

    pub fn previous(&self) -> FiscalPeriod {
        self.offset(-1)
    }

    /// Same quarter of the previous fiscal year.
    pub fn year_ago(&self) -> FiscalPeriod {
        self.offset(-4)
    }

    /// Signed number of quarters from `self` to `later`.
    pub fn quarters_until(&self, later: FiscalPeriod) -> i64 {
        later.ordinal() - self.ordinal()
    }

    pub fn is_immediately_before(&self, other: FiscalPeriod) -> bool {
        self.quarters_until(other) == 1
    }
}

impl fmt::Display for FiscalPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{} FY{:02}", self.quarter, self.year.rem_euclid(100))
    }
}

impl FromStr for FiscalPeriod {
    type Err = RevtrendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_period_label(s).ok_or_else(|| {
            RevtrendError::InvalidPeriod(format!("'{s}' is not a fiscal quarter label"))
        })
    }
}

/// The fixed set of reporting segments. Declaration order is the canonical
/// segment order used by records, storage and output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Segment {
    DataCenter,
    Gaming,
    ProfessionalVisualization,
    Automotive,
    OemAndOther,
}

impl Segment {
    pub const ALL: [Segment; 5] = [
        Segment::DataCenter,
        Segment::Gaming,
        Segment::ProfessionalVisualization,
        Segment::Automotive,
        Segment::OemAndOther,
    ];

    /// Stable machine key shared by extraction, storage and presentation.
    pub fn key(&self) -> &'static str {
        match self {
            Segment::DataCenter => "data_center",
            Segment::Gaming => "gaming",
            Segment::ProfessionalVisualization => "professional_visualization",
            Segment::Automotive => "automotive",
            Segment::OemAndOther => "oem_and_other",
        }
    }

    pub fn from_key(key: &str) -> Option<Segment> {
        Segment::ALL.into_iter().find(|s| s.key() == key)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Segment::DataCenter => "Data Center",
            Segment::Gaming => "Gaming",
            Segment::ProfessionalVisualization => "Professional Visualization",
            Segment::Automotive => "Automotive",
            Segment::OemAndOther => "OEM & Other",
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Base unit the document states its figures in ("$ in millions").
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportingUnit {
    Units,
    Thousands,
    #[default]
    Millions,
    Billions,
}

impl ReportingUnit {
    pub fn multiplier(&self) -> Decimal {
        match self {
            ReportingUnit::Units => Decimal::ONE,
            ReportingUnit::Thousands => Decimal::from(1_000),
            ReportingUnit::Millions => Decimal::from(1_000_000),
            ReportingUnit::Billions => Decimal::from(1_000_000_000),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportingUnit::Units => "units",
            ReportingUnit::Thousands => "thousands",
            ReportingUnit::Millions => "millions",
            ReportingUnit::Billions => "billions",
        }
    }

    pub fn from_key(key: &str) -> Option<ReportingUnit> {
        match key {
            "units" => Some(ReportingUnit::Units),
            "thousands" => Some(ReportingUnit::Thousands),
            "millions" => Some(ReportingUnit::Millions),
            "billions" => Some(ReportingUnit::Billions),
            _ => None,
        }
    }

    /// Detect a stated unit in free text such as "($ in millions)".
    pub fn from_str_loose(s: &str) -> Option<ReportingUnit> {
        let lower = s.to_lowercase();
        if lower.contains("in thousands") {
            Some(ReportingUnit::Thousands)
        } else if lower.contains("in millions") {
            Some(ReportingUnit::Millions)
        } else if lower.contains("in billions") {
            Some(ReportingUnit::Billions)
        } else {
            None
        }
    }
}

impl fmt::Display for ReportingUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What a table row designates once its label is normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    Segment(Segment),
    Total,
}

impl fmt::Display for RowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowKind::Segment(s) => write!(f, "{s}"),
            RowKind::Total => write!(f, "Total"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TotalSource {
    /// Read from the table's total row.
    Reported,
    /// No total row; the segment sum stands in.
    Summed,
}

impl TotalSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            TotalSource::Reported => "reported",
            TotalSource::Summed => "summed",
        }
    }

    pub fn from_key(key: &str) -> Option<TotalSource> {
        match key {
            "reported" => Some(TotalSource::Reported),
            "summed" => Some(TotalSource::Summed),
            _ => None,
        }
    }
}

/// Reason a record cannot be trusted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordFlag {
    TotalMismatch {
        reported: Decimal,
        segment_sum: Decimal,
    },
    MissingAmount {
        segment: Segment,
    },
    DuplicateRow {
        row: RowKind,
    },
    NegativeAmount {
        segment: Segment,
    },
    /// The segment amounts add up past the representable range.
    SumOverflow,
}

impl fmt::Display for RecordFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordFlag::TotalMismatch {
                reported,
                segment_sum,
            } => write!(
                f,
                "reported total {reported} differs from segment sum {segment_sum}"
            ),
            RecordFlag::MissingAmount { segment } => write!(f, "{segment} amount missing"),
            RecordFlag::DuplicateRow { row } => write!(f, "duplicate {row} row ignored"),
            RecordFlag::NegativeAmount { segment } => write!(f, "{segment} amount is negative"),
            RecordFlag::SumOverflow => write!(f, "segment amounts overflow when summed"),
        }
    }
}

/// One quarter's extracted revenue. Amounts are absolute currency amounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueRecord {
    pub period: FiscalPeriod,
    pub segment_amounts: BTreeMap<Segment, Decimal>,
    pub total: Decimal,
    pub total_source: TotalSource,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<RecordFlag>,
}

impl RevenueRecord {
    /// Build a record from segment amounts and an optional reported total.
    ///
    /// Without a reported total the segment sum becomes the total. A reported
    /// total that disagrees with the sum by more than `tolerance` is kept and
    /// flagged. The comparison is skipped when a segment amount is missing.
    ///
    /// A segment sum that overflows is flagged with [`RecordFlag::SumOverflow`];
    /// without a reported total the summed total then saturates.
    pub fn assemble(
        period: FiscalPeriod,
        segment_amounts: BTreeMap<Segment, Decimal>,
        reported_total: Option<Decimal>,
        tolerance: Decimal,
        mut flags: Vec<RecordFlag>,
    ) -> RevenueRecord {
        let segment_sum = checked_sum(&segment_amounts);
        if segment_sum.is_none() {
            flags.push(RecordFlag::SumOverflow);
        }
        let incomplete = flags
            .iter()
            .any(|f| matches!(f, RecordFlag::MissingAmount { .. }));

        let (total, total_source) = match (reported_total, segment_sum) {
            (Some(reported), Some(segment_sum)) => {
                let beyond = reported
                    .checked_sub(segment_sum)
                    .is_none_or(|diff| diff.abs() > tolerance);
                if !incomplete && beyond {
                    flags.push(RecordFlag::TotalMismatch {
                        reported,
                        segment_sum,
                    });
                }
                (reported, TotalSource::Reported)
            }
            (Some(reported), None) => (reported, TotalSource::Reported),
            (None, Some(segment_sum)) => (segment_sum, TotalSource::Summed),
            (None, None) => (
                segment_amounts
                    .values()
                    .fold(Decimal::ZERO, |acc, v| acc.saturating_add(*v)),
                TotalSource::Summed,
            ),
        };

        RevenueRecord {
            period,
            segment_amounts,
            total,
            total_source,
            flags,
        }
    }

    /// Sum of the segment amounts, `None` on overflow.
    pub fn segment_sum(&self) -> Option<Decimal> {
        checked_sum(&self.segment_amounts)
    }

    pub fn amount(&self, segment: Segment) -> Option<Decimal> {
        self.segment_amounts.get(&segment).copied()
    }

    pub fn value(&self, subject: Subject) -> Option<Decimal> {
        match subject {
            Subject::Total => Some(self.total),
            Subject::Segment(s) => self.amount(s),
        }
    }

    pub fn is_consistent(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn has_mismatch(&self) -> bool {
        self.flags
            .iter()
            .any(|f| matches!(f, RecordFlag::TotalMismatch { .. }))
    }
}

fn checked_sum(amounts: &BTreeMap<Segment, Decimal>) -> Option<Decimal> {
    amounts
        .values()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v))
}

/// Records ordered ascending by period, without duplicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SeriesRepr")]
pub struct RevenueSeries {
    unit: ReportingUnit,
    records: Vec<RevenueRecord>,
}

#[derive(Deserialize)]
struct SeriesRepr {
    #[serde(default)]
    unit: ReportingUnit,
    records: Vec<RevenueRecord>,
}

impl TryFrom<SeriesRepr> for RevenueSeries {
    type Error = RevtrendError;

    fn try_from(repr: SeriesRepr) -> Result<Self, Self::Error> {
        RevenueSeries::new(repr.unit, repr.records)
    }
}

impl RevenueSeries {
    /// Sort records by period and reject duplicates.
    pub fn new(
        unit: ReportingUnit,
        mut records: Vec<RevenueRecord>,
    ) -> Result<RevenueSeries, RevtrendError> {
        records.sort_by_key(|r| r.period);
        if let Some(pair) = records.windows(2).find(|w| w[0].period == w[1].period) {
            return Err(RevtrendError::InvalidSeries(format!(
                "duplicate period {}",
                pair[0].period
            )));
        }
        Ok(RevenueSeries { unit, records })
    }

    /// The base unit the source document reported in.
    pub fn unit(&self) -> ReportingUnit {
        self.unit
    }

    pub fn records(&self) -> &[RevenueRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RevenueRecord> {
        self.records.iter()
    }

    pub fn first(&self) -> Option<&RevenueRecord> {
        self.records.first()
    }

    pub fn last(&self) -> Option<&RevenueRecord> {
        self.records.last()
    }

    pub fn get(&self, period: FiscalPeriod) -> Option<&RevenueRecord> {
        self.records
            .binary_search_by_key(&period, |r| r.period)
            .ok()
            .map(|i| &self.records[i])
    }

    pub fn periods(&self) -> Vec<FiscalPeriod> {
        self.records.iter().map(|r| r.period).collect()
    }

    /// True when both periods are in the series and `earlier` is the quarter
    /// right before `later`.
    pub fn is_immediately_preceding(&self, earlier: FiscalPeriod, later: FiscalPeriod) -> bool {
        earlier.is_immediately_before(later)
            && self.get(earlier).is_some()
            && self.get(later).is_some()
    }

    /// Consecutive record pairs with at least one missing quarter between them.
    pub fn gaps(&self) -> Vec<(FiscalPeriod, FiscalPeriod)> {
        self.records
            .windows(2)
            .filter(|w| !w[0].period.is_immediately_before(w[1].period))
            .map(|w| (w[0].period, w[1].period))
            .collect()
    }

    /// `Total` followed by every segment present in any record, in canonical order.
    pub fn subjects(&self) -> Vec<Subject> {
        let mut subjects = vec![Subject::Total];
        subjects.extend(
            Segment::ALL
                .into_iter()
                .filter(|s| self.records.iter().any(|r| r.segment_amounts.contains_key(s)))
                .map(Subject::Segment),
        );
        subjects
    }
}

impl<'a> IntoIterator for &'a RevenueSeries {
    type Item = &'a RevenueRecord;
    type IntoIter = std::slice::Iter<'a, RevenueRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// What a growth metric measures: the total or one segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Subject {
    Total,
    Segment(Segment),
}

impl Subject {
    pub fn key(&self) -> &'static str {
        match self {
            Subject::Total => "total",
            Subject::Segment(s) => s.key(),
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Subject::Total => "Total",
            Subject::Segment(s) => s.display_name(),
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl From<Subject> for String {
    fn from(s: Subject) -> Self {
        s.key().to_string()
    }
}

impl TryFrom<String> for Subject {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value == "total" {
            return Ok(Subject::Total);
        }
        Segment::from_key(&value)
            .map(Subject::Segment)
            .ok_or_else(|| format!("unknown subject '{value}'"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    QuarterOverQuarter,
    YearOverYear,
    CompoundAnnual,
    /// A segment's change as a percentage of the total's change.
    GrowthContribution,
    /// Value relative to a baseline period set to 100.
    Indexed,
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricKind::QuarterOverQuarter => write!(f, "QoQ"),
            MetricKind::YearOverYear => write!(f, "YoY"),
            MetricKind::CompoundAnnual => write!(f, "CAGR"),
            MetricKind::GrowthContribution => write!(f, "contribution"),
            MetricKind::Indexed => write!(f, "index"),
        }
    }
}

/// A derived growth figure. `value` is a signed percentage (an index level
/// for [`MetricKind::Indexed`]), `None` when the baseline is zero (or
/// non-positive for CAGR and the index) or the comparison period is absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthMetric {
    pub kind: MetricKind,
    pub subject: Subject,
    /// The later period of the comparison.
    pub period: FiscalPeriod,
    /// The earlier period the change is measured from.
    pub baseline: FiscalPeriod,
    pub value: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn q(year: i32, quarter: u8) -> FiscalPeriod {
        FiscalPeriod::new(year, quarter).unwrap()
    }

    fn record(period: FiscalPeriod, total: Decimal) -> RevenueRecord {
        RevenueRecord::assemble(period, BTreeMap::new(), Some(total), Decimal::ONE, vec![])
    }

    #[test]
    fn test_quarter_out_of_range_rejected() {
        assert!(FiscalPeriod::new(2025, 0).is_err());
        assert!(FiscalPeriod::new(2025, 5).is_err());
    }

    #[test]
    fn test_period_ordering_and_arithmetic() {
        assert!(q(2024, 4) < q(2025, 1));
        assert_eq!(q(2024, 4).next(), q(2025, 1));
        assert_eq!(q(2025, 1).previous(), q(2024, 4));
        assert_eq!(q(2025, 3).year_ago(), q(2024, 3));
        assert_eq!(q(2024, 1).quarters_until(q(2025, 1)), 4);
        assert!(q(2024, 4).is_immediately_before(q(2025, 1)));
        assert!(!q(2024, 3).is_immediately_before(q(2025, 1)));
    }

    #[test]
    fn test_period_display_and_parse() {
        assert_eq!(q(2025, 1).to_string(), "Q1 FY25");
        assert_eq!("Q3 FY24".parse::<FiscalPeriod>().unwrap(), q(2024, 3));
        assert!("FY24".parse::<FiscalPeriod>().is_err());
    }

    #[test]
    fn test_period_deserialize_validates_quarter() {
        let bad = r#"{"fiscal_year": 2025, "quarter": 7}"#;
        assert!(serde_json::from_str::<FiscalPeriod>(bad).is_err());
        let good = r#"{"fiscal_year": 2025, "quarter": 2}"#;
        assert_eq!(serde_json::from_str::<FiscalPeriod>(good).unwrap(), q(2025, 2));
    }

    #[test]
    fn test_segment_keys() {
        assert_eq!(Segment::OemAndOther.key(), "oem_and_other");
        assert_eq!(
            serde_json::to_string(&Segment::ProfessionalVisualization).unwrap(),
            "\"professional_visualization\""
        );
        for s in Segment::ALL {
            assert_eq!(Segment::from_key(s.key()), Some(s));
        }
    }

    #[test]
    fn test_assemble_summed_total() {
        let mut amounts = BTreeMap::new();
        amounts.insert(Segment::Gaming, dec!(2000));
        amounts.insert(Segment::DataCenter, dec!(30000));
        let r = RevenueRecord::assemble(q(2025, 1), amounts, None, Decimal::ONE, vec![]);
        assert_eq!(r.total, dec!(32000));
        assert_eq!(r.total_source, TotalSource::Summed);
        assert!(r.is_consistent());
        let order: Vec<Segment> = r.segment_amounts.keys().copied().collect();
        assert_eq!(order, vec![Segment::DataCenter, Segment::Gaming]);
    }

    #[test]
    fn test_assemble_flags_mismatch_beyond_tolerance() {
        let mut amounts = BTreeMap::new();
        amounts.insert(Segment::DataCenter, dec!(100));
        amounts.insert(Segment::Gaming, dec!(50));
        let within =
            RevenueRecord::assemble(q(2025, 1), amounts.clone(), Some(dec!(151)), dec!(1), vec![]);
        assert!(within.is_consistent());

        let beyond =
            RevenueRecord::assemble(q(2025, 1), amounts, Some(dec!(160)), dec!(1), vec![]);
        assert!(beyond.has_mismatch());
        assert_eq!(beyond.total, dec!(160));
    }

    #[test]
    fn test_assemble_overflowing_sum_is_flagged() {
        let mut amounts = BTreeMap::new();
        amounts.insert(Segment::DataCenter, Decimal::MAX);
        amounts.insert(Segment::Gaming, Decimal::MAX);
        let summed =
            RevenueRecord::assemble(q(2025, 1), amounts.clone(), None, Decimal::ONE, vec![]);
        assert_eq!(summed.flags, vec![RecordFlag::SumOverflow]);
        assert_eq!(summed.total, Decimal::MAX);
        assert_eq!(summed.segment_sum(), None);

        let reported =
            RevenueRecord::assemble(q(2025, 1), amounts, Some(dec!(100)), Decimal::ONE, vec![]);
        assert_eq!(reported.total, dec!(100));
        assert_eq!(reported.total_source, TotalSource::Reported);
        assert!(!reported.has_mismatch());
        assert!(reported.flags.contains(&RecordFlag::SumOverflow));
    }

    #[test]
    fn test_assemble_mismatch_when_difference_overflows() {
        let mut amounts = BTreeMap::new();
        amounts.insert(Segment::DataCenter, Decimal::MAX);
        let r = RevenueRecord::assemble(q(2025, 1), amounts, Some(Decimal::MIN), dec!(1), vec![]);
        assert!(r.has_mismatch());
    }

    #[test]
    fn test_series_sorted_and_rejects_duplicates() {
        let s = RevenueSeries::new(
            ReportingUnit::Millions,
            vec![record(q(2025, 2), dec!(2)), record(q(2025, 1), dec!(1))],
        )
        .unwrap();
        assert_eq!(s.periods(), vec![q(2025, 1), q(2025, 2)]);

        let dup = RevenueSeries::new(
            ReportingUnit::Millions,
            vec![record(q(2025, 1), dec!(1)), record(q(2025, 1), dec!(2))],
        );
        assert!(dup.is_err());
    }

    #[test]
    fn test_series_gap_detection() {
        let s = RevenueSeries::new(
            ReportingUnit::Millions,
            vec![
                record(q(2024, 3), dec!(1)),
                record(q(2024, 4), dec!(1)),
                record(q(2025, 2), dec!(1)),
            ],
        )
        .unwrap();
        assert!(s.is_immediately_preceding(q(2024, 3), q(2024, 4)));
        assert!(!s.is_immediately_preceding(q(2024, 4), q(2025, 2)));
        // Q1 FY25 is adjacent to Q2 FY25 but absent from the series.
        assert!(!s.is_immediately_preceding(q(2025, 1), q(2025, 2)));
        assert_eq!(s.gaps(), vec![(q(2024, 4), q(2025, 2))]);
    }

    #[test]
    fn test_subject_serde() {
        let json = serde_json::to_string(&Subject::Segment(Segment::Gaming)).unwrap();
        assert_eq!(json, "\"gaming\"");
        let back: Subject = serde_json::from_str("\"total\"").unwrap();
        assert_eq!(back, Subject::Total);
    }
}
