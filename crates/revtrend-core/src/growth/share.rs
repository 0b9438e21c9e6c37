use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::model::{FiscalPeriod, RevenueSeries, Segment};

/// One segment's slice of a period's total revenue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentShare {
    pub period: FiscalPeriod,
    pub segment: Segment,
    pub amount: Decimal,
    /// Percentage of the period total; `None` when the total is not positive.
    pub share: Option<f64>,
}

/// Each segment's percentage of its period total, per period in series order.
pub fn compute_segment_share(series: &RevenueSeries) -> Vec<SegmentShare> {
    let mut shares = Vec::new();
    for record in series {
        for (&segment, &amount) in &record.segment_amounts {
            let share = if record.total > Decimal::ZERO {
                amount
                    .checked_div(record.total)
                    .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
                    .and_then(|p| p.to_f64())
            } else {
                None
            };
            shares.push(SegmentShare {
                period: record.period,
                segment,
                amount,
                share,
            });
        }
    }
    shares
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ReportingUnit, RevenueRecord};
    use rust_decimal_macros::dec;
    use std::collections::BTreeMap;

    #[test]
    fn test_shares_of_total() {
        let period = FiscalPeriod::new(2025, 4).unwrap();
        let mut amounts = BTreeMap::new();
        amounts.insert(Segment::DataCenter, dec!(75));
        amounts.insert(Segment::Gaming, dec!(25));
        let record = RevenueRecord::assemble(period, amounts, None, dec!(1), vec![]);
        let series = RevenueSeries::new(ReportingUnit::Millions, vec![record]).unwrap();

        let shares = compute_segment_share(&series);
        assert_eq!(shares.len(), 2);
        assert_eq!(shares[0].segment, Segment::DataCenter);
        assert_eq!(shares[0].share, Some(75.0));
        assert_eq!(shares[1].share, Some(25.0));
    }

    #[test]
    fn test_zero_total_has_no_share() {
        let period = FiscalPeriod::new(2025, 1).unwrap();
        let mut amounts = BTreeMap::new();
        amounts.insert(Segment::Automotive, dec!(0));
        let record = RevenueRecord::assemble(period, amounts, None, dec!(1), vec![]);
        let series = RevenueSeries::new(ReportingUnit::Millions, vec![record]).unwrap();
        assert_eq!(compute_segment_share(&series)[0].share, None);
    }
}
