use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::error::RevtrendError;
use crate::model::{FiscalPeriod, GrowthMetric, MetricKind, RevenueSeries};

/// Every subject's value in every period relative to `baseline` = 100.
///
/// The index is undefined for a subject whose baseline value is zero,
/// negative or missing.
pub fn compute_indexed(
    series: &RevenueSeries,
    baseline: FiscalPeriod,
) -> Result<Vec<GrowthMetric>, RevtrendError> {
    let start = series
        .get(baseline)
        .ok_or(RevtrendError::MissingBaseline(baseline))?;
    let subjects = series.subjects();
    let mut metrics = Vec::new();

    for current in series {
        for &subject in &subjects {
            let value = match (current.value(subject), start.value(subject)) {
                (Some(v), Some(base)) => index_level(v, base),
                _ => None,
            };
            metrics.push(GrowthMetric {
                kind: MetricKind::Indexed,
                subject,
                period: current.period,
                baseline,
                value,
            });
        }
    }

    Ok(metrics)
}

fn index_level(value: Decimal, base: Decimal) -> Option<f64> {
    if base <= Decimal::ZERO {
        return None;
    }
    value
        .checked_div(base)?
        .checked_mul(Decimal::ONE_HUNDRED)?
        .to_f64()
}
