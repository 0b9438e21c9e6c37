pub mod contribution;
pub mod indexed;
pub mod share;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::RevtrendError;
use crate::model::{FiscalPeriod, GrowthMetric, MetricKind, RevenueSeries};
use contribution::compute_growth_contribution;
use indexed::compute_indexed;
use share::{compute_segment_share, SegmentShare};

/// Every derived figure for one series, ready for presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthReport {
    pub baseline: FiscalPeriod,
    pub qoq: Vec<GrowthMetric>,
    pub yoy: Vec<GrowthMetric>,
    pub cagr: Vec<GrowthMetric>,
    pub shares: Vec<SegmentShare>,
    pub contributions: Vec<GrowthMetric>,
    /// Levels against the CAGR baseline set to 100.
    pub indexed: Vec<GrowthMetric>,
}

/// Quarter-over-quarter change for every record after the first.
///
/// Each record is compared with the record before it in the series. When
/// that record is not the immediately preceding quarter the value is
/// undefined, so every subject gets exactly `len - 1` metrics.
pub fn compute_qoq(series: &RevenueSeries) -> Vec<GrowthMetric> {
    let subjects = series.subjects();
    let mut metrics = Vec::new();

    for pair in series.records().windows(2) {
        let (previous, current) = (&pair[0], &pair[1]);
        let adjacent = previous.period.is_immediately_before(current.period);
        for &subject in &subjects {
            let value = if adjacent {
                match (current.value(subject), previous.value(subject)) {
                    (Some(c), Some(p)) => percent_change(c, p),
                    _ => None,
                }
            } else {
                None
            };
            metrics.push(GrowthMetric {
                kind: MetricKind::QuarterOverQuarter,
                subject,
                period: current.period,
                baseline: previous.period,
                value,
            });
        }
    }

    metrics
}

/// Year-over-year change against the same quarter one fiscal year earlier.
/// Periods whose year-ago quarter is not in the series get no metric.
pub fn compute_yoy(series: &RevenueSeries) -> Vec<GrowthMetric> {
    let subjects = series.subjects();
    let mut metrics = Vec::new();

    for current in series {
        let Some(previous) = series.get(current.period.year_ago()) else {
            continue;
        };
        for &subject in &subjects {
            let value = match (current.value(subject), previous.value(subject)) {
                (Some(c), Some(p)) => percent_change(c, p),
                _ => None,
            };
            metrics.push(GrowthMetric {
                kind: MetricKind::YearOverYear,
                subject,
                period: current.period,
                baseline: previous.period,
                value,
            });
        }
    }

    metrics
}

/// Compound annual growth from `baseline` to every later period.
///
/// Elapsed time is counted in quarters, so four quarters make one year.
/// The rate is undefined when the baseline value is zero or negative or the
/// later value is not positive.
pub fn compute_cagr(
    series: &RevenueSeries,
    baseline: FiscalPeriod,
) -> Result<Vec<GrowthMetric>, RevtrendError> {
    let start = series
        .get(baseline)
        .ok_or(RevtrendError::MissingBaseline(baseline))?;
    let subjects = series.subjects();
    let mut metrics = Vec::new();

    for current in series.iter().filter(|r| r.period > baseline) {
        let years = baseline.quarters_until(current.period) as f64 / 4.0;
        for &subject in &subjects {
            let value = match (current.value(subject), start.value(subject)) {
                (Some(end), Some(begin)) => compound_annual_rate(begin, end, years),
                _ => None,
            };
            metrics.push(GrowthMetric {
                kind: MetricKind::CompoundAnnual,
                subject,
                period: current.period,
                baseline,
                value,
            });
        }
    }

    Ok(metrics)
}

/// Bundle every derived series. CAGR and the index are anchored at
/// `baseline`, or at the first period when none is given.
pub fn analyze(
    series: &RevenueSeries,
    baseline: Option<FiscalPeriod>,
) -> Result<GrowthReport, RevtrendError> {
    let baseline = match baseline {
        Some(p) => p,
        None => {
            series
                .first()
                .ok_or_else(|| RevtrendError::InvalidSeries("series has no records".into()))?
                .period
        }
    };

    Ok(GrowthReport {
        baseline,
        qoq: compute_qoq(series),
        yoy: compute_yoy(series),
        cagr: compute_cagr(series, baseline)?,
        shares: compute_segment_share(series),
        contributions: compute_growth_contribution(series),
        indexed: compute_indexed(series, baseline)?,
    })
}

/// `(current - previous) / |previous| * 100`, undefined for a zero previous
/// or when the difference overflows.
pub fn percent_change(current: Decimal, previous: Decimal) -> Option<f64> {
    if previous.is_zero() {
        return None;
    }
    let ratio = current.checked_sub(previous)?.checked_div(previous.abs())?;
    ratio.checked_mul(Decimal::ONE_HUNDRED)?.to_f64()
}

/// `((end / begin) ^ (1 / years) - 1) * 100`.
pub fn compound_annual_rate(begin: Decimal, end: Decimal, years: f64) -> Option<f64> {
    if begin <= Decimal::ZERO || end <= Decimal::ZERO || years <= 0.0 {
        return None;
    }
    let ratio = end.checked_div(begin)?.to_f64()?;
    let rate = (ratio.powf(1.0 / years) - 1.0) * 100.0;
    rate.is_finite().then_some(rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ReportingUnit, RevenueRecord, Segment, Subject};
    use rust_decimal_macros::dec;
    use std::collections::BTreeMap;

    fn q(year: i32, quarter: u8) -> FiscalPeriod {
        FiscalPeriod::new(year, quarter).unwrap()
    }

    fn totals(points: &[((i32, u8), Decimal)]) -> RevenueSeries {
        let records = points
            .iter()
            .map(|&((y, qn), total)| {
                RevenueRecord::assemble(q(y, qn), BTreeMap::new(), Some(total), dec!(1), vec![])
            })
            .collect();
        RevenueSeries::new(ReportingUnit::Millions, records).unwrap()
    }

    fn values(metrics: &[GrowthMetric], subject: Subject) -> Vec<Option<f64>> {
        metrics
            .iter()
            .filter(|m| m.subject == subject)
            .map(|m| m.value)
            .collect()
    }

    #[test]
    fn test_qoq_zero_baseline_is_undefined() {
        let series = totals(&[
            ((2025, 1), dec!(100)),
            ((2025, 2), dec!(110)),
            ((2025, 3), dec!(0)),
            ((2025, 4), dec!(120)),
        ]);
        let metrics = compute_qoq(&series);
        assert_eq!(metrics.len(), 3);
        assert_eq!(metrics[0].period, q(2025, 2));
        assert_eq!(metrics[0].value, Some(10.0));
        assert_eq!(metrics[1].value, Some(-100.0));
        assert_eq!(metrics[2].value, None);
    }

    #[test]
    fn test_qoq_first_period_excluded() {
        let series = totals(&[((2025, 1), dec!(100)), ((2025, 2), dec!(150))]);
        let metrics = compute_qoq(&series);
        assert!(metrics.iter().all(|m| m.period != q(2025, 1)));
        assert_eq!(metrics[0].baseline, q(2025, 1));
        assert_eq!(metrics[0].value, Some(50.0));
    }

    #[test]
    fn test_qoq_across_gap_is_undefined() {
        let series = totals(&[((2025, 1), dec!(100)), ((2025, 3), dec!(120))]);
        let metrics = compute_qoq(&series);
        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics[0].value, None);
    }

    #[test]
    fn test_qoq_negative_previous_uses_absolute_value() {
        assert_eq!(percent_change(dec!(-50), dec!(-100)), Some(50.0));
    }

    #[test]
    fn test_percent_change_overflow_is_undefined() {
        assert_eq!(percent_change(Decimal::MAX, -Decimal::ONE), None);
        assert_eq!(percent_change(Decimal::MIN, Decimal::MAX), None);
    }

    #[test]
    fn test_qoq_per_subject_count() {
        let mut amounts = BTreeMap::new();
        amounts.insert(Segment::Gaming, dec!(10));
        amounts.insert(Segment::DataCenter, dec!(90));
        let records = (1..=4)
            .map(|qn| {
                RevenueRecord::assemble(q(2025, qn), amounts.clone(), None, dec!(1), vec![])
            })
            .collect();
        let series = RevenueSeries::new(ReportingUnit::Millions, records).unwrap();
        let metrics = compute_qoq(&series);
        for subject in series.subjects() {
            assert_eq!(values(&metrics, subject).len(), 3);
        }
        assert_eq!(metrics.len(), 9);
    }

    #[test]
    fn test_yoy_skips_missing_year_ago() {
        let series = totals(&[
            ((2024, 1), dec!(80)),
            ((2024, 3), dec!(90)),
            ((2025, 1), dec!(100)),
            ((2025, 2), dec!(110)),
        ]);
        let metrics = compute_yoy(&series);
        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics[0].period, q(2025, 1));
        assert_eq!(metrics[0].baseline, q(2024, 1));
        assert_eq!(metrics[0].value, Some(25.0));
    }

    #[test]
    fn test_cagr_one_year_equals_simple_growth() {
        let series = totals(&[((2024, 4), dec!(200)), ((2025, 4), dec!(242))]);
        let metrics = compute_cagr(&series, q(2024, 4)).unwrap();
        assert_eq!(metrics.len(), 1);
        let value = metrics[0].value.unwrap();
        assert!((value - 21.0).abs() < 1e-9, "got {value}");
    }

    #[test]
    fn test_cagr_two_years() {
        let series = totals(&[((2023, 2), dec!(100)), ((2025, 2), dec!(121))]);
        let value = compute_cagr(&series, q(2023, 2)).unwrap()[0].value.unwrap();
        assert!((value - 10.0).abs() < 1e-9, "got {value}");
    }

    #[test]
    fn test_cagr_zero_or_negative_baseline_undefined() {
        let series = totals(&[((2024, 1), dec!(0)), ((2025, 1), dec!(50))]);
        assert_eq!(compute_cagr(&series, q(2024, 1)).unwrap()[0].value, None);
        let series = totals(&[((2024, 1), dec!(-10)), ((2025, 1), dec!(50))]);
        assert_eq!(compute_cagr(&series, q(2024, 1)).unwrap()[0].value, None);
    }

    #[test]
    fn test_cagr_missing_baseline() {
        let series = totals(&[((2025, 1), dec!(100))]);
        let err = compute_cagr(&series, q(2024, 1)).unwrap_err();
        assert!(matches!(err, RevtrendError::MissingBaseline(p) if p == q(2024, 1)));
    }

    #[test]
    fn test_growth_is_idempotent() {
        let series = totals(&[
            ((2024, 1), dec!(80)),
            ((2024, 2), dec!(85)),
            ((2025, 1), dec!(100)),
            ((2025, 2), dec!(90)),
        ]);
        assert_eq!(compute_qoq(&series), compute_qoq(&series));
        assert_eq!(compute_yoy(&series), compute_yoy(&series));
    }

    #[test]
    fn test_analyze_defaults_baseline_to_first_period() {
        let series = totals(&[((2024, 4), dec!(200)), ((2025, 4), dec!(242))]);
        let report = analyze(&series, None).unwrap();
        assert_eq!(report.baseline, q(2024, 4));
        assert_eq!(report.cagr.len(), 1);
        assert_eq!(report.yoy.len(), 1);
        assert_eq!(report.qoq.len(), 1);
        assert_eq!(report.indexed.len(), 2);
        assert_eq!(report.indexed[1].value, Some(121.0));
        assert!(report.contributions.is_empty());
    }
}
