use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::model::{GrowthMetric, MetricKind, RevenueSeries, Subject};

/// Each segment's share of the total's quarter-over-quarter change.
///
/// `(segment[i] - segment[i-1]) / (total[i] - total[i-1]) * 100`, for every
/// segment and every record after the first. Undefined when the total did
/// not change, when either quarter lacks the segment, or when the two
/// records are not consecutive quarters.
pub fn compute_growth_contribution(series: &RevenueSeries) -> Vec<GrowthMetric> {
    let segments: Vec<Subject> = series
        .subjects()
        .into_iter()
        .filter(|s| *s != Subject::Total)
        .collect();
    let mut metrics = Vec::new();

    for pair in series.records().windows(2) {
        let (previous, current) = (&pair[0], &pair[1]);
        let total_change = previous
            .period
            .is_immediately_before(current.period)
            .then(|| current.total.checked_sub(previous.total))
            .flatten();

        for &subject in &segments {
            let value = match (total_change, current.value(subject), previous.value(subject)) {
                (Some(total_change), Some(c), Some(p)) => contribution(c, p, total_change),
                _ => None,
            };
            metrics.push(GrowthMetric {
                kind: MetricKind::GrowthContribution,
                subject,
                period: current.period,
                baseline: previous.period,
                value,
            });
        }
    }

    metrics
}

fn contribution(current: Decimal, previous: Decimal, total_change: Decimal) -> Option<f64> {
    if total_change.is_zero() {
        return None;
    }
    current
        .checked_sub(previous)?
        .checked_div(total_change)?
        .checked_mul(Decimal::ONE_HUNDRED)?
        .to_f64()
}
