pub mod layout;
pub mod normalize;
pub mod period;
pub mod values;

use std::collections::{BTreeMap, HashSet};

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};

use crate::diagnostics::{ExtractionWarning, WarningKind};
use crate::error::RevtrendError;
use crate::extraction::table::TableRegion;
use crate::model::{RecordFlag, RevenueRecord, RevenueSeries, RowKind, Segment};
use crate::profile::schema::ProfileDef;
use normalize::LabelMatcher;
use values::normalize_amount_in;

/// The extracted series plus every recoverable issue met along the way.
#[derive(Debug, Clone, Serialize)]
pub struct Extraction {
    pub series: RevenueSeries,
    pub warnings: Vec<ExtractionWarning>,
}

/// How a body row was classified, decided once for the whole table.
#[derive(Debug, Clone, Copy)]
enum RowRole {
    Segment(Segment),
    Total,
    /// A second row for a segment or the total. Its cells are not used.
    Duplicate(RowKind),
    Ignored,
}

/// Read one revenue record per period column of a located table.
///
/// Rows are classified by label: segment rows contribute amounts, the total
/// row supplies the reported total, anything else is skipped (and reported
/// when it carries numbers). Cell-level problems flag the affected record
/// and add a warning; only a table that yields no record at all fails.
pub fn extract(region: &TableRegion, profile: &ProfileDef) -> Result<Extraction, RevtrendError> {
    let matcher = LabelMatcher::from_profile(profile);
    let unit = region.unit();
    let tolerance = profile
        .tolerance
        .checked_mul(unit.multiplier())
        .unwrap_or(Decimal::MAX);
    let mut warnings: Vec<ExtractionWarning> = region.warnings().to_vec();

    let roles = classify_rows(region, &matcher, &mut warnings);

    let mut records = Vec::new();
    let mut seen_periods = HashSet::new();

    for (col, column) in region.columns().iter().enumerate() {
        let period = column.period;
        let header = region.header_location();

        if !seen_periods.insert(period) {
            warnings.push(
                ExtractionWarning::new(
                    WarningKind::DuplicatePeriod,
                    header,
                    format!("column {} repeats an earlier header; first occurrence kept", col + 1),
                )
                .for_period(period),
            );
            continue;
        }

        let mut amounts: BTreeMap<Segment, Decimal> = BTreeMap::new();
        let mut reported_total = None;
        let mut flags = Vec::new();

        for (r, role) in roles.iter().enumerate() {
            let row = &region.rows()[r];
            let cell = region.cell(r, col);
            match *role {
                RowRole::Segment(segment) => {
                    let Some(raw) = cell else {
                        flags.push(RecordFlag::MissingAmount { segment });
                        warnings.push(
                            ExtractionWarning::new(
                                WarningKind::NotNumeric,
                                row.location,
                                format!("{segment} has no amount"),
                            )
                            .for_period(period),
                        );
                        continue;
                    };
                    match normalize_amount_in(raw, unit) {
                        Ok(amount) => {
                            if amount.is_sign_negative() && !amount.is_zero() {
                                flags.push(RecordFlag::NegativeAmount { segment });
                                warnings.push(
                                    ExtractionWarning::new(
                                        WarningKind::NegativeAmount,
                                        row.location,
                                        format!("{segment} amount {raw} is negative"),
                                    )
                                    .for_period(period),
                                );
                            }
                            amounts.insert(segment, amount);
                        }
                        Err(e) => {
                            flags.push(RecordFlag::MissingAmount { segment });
                            warnings.push(
                                ExtractionWarning::new(
                                    WarningKind::NotNumeric,
                                    row.location,
                                    format!("{segment} cell: {e}"),
                                )
                                .for_period(period),
                            );
                        }
                    }
                }
                RowRole::Total => {
                    let Some(raw) = cell else { continue };
                    match normalize_amount_in(raw, unit) {
                        Ok(amount) => reported_total = Some(amount),
                        Err(e) => warnings.push(
                            ExtractionWarning::new(
                                WarningKind::NotNumeric,
                                row.location,
                                format!("total cell: {e}"),
                            )
                            .for_period(period),
                        ),
                    }
                }
                RowRole::Duplicate(kind) => {
                    if cell.is_some_and(|raw| normalize_amount_in(raw, unit).is_ok()) {
                        flags.push(RecordFlag::DuplicateRow { row: kind });
                    }
                }
                RowRole::Ignored => {}
            }
        }

        if amounts.is_empty() && reported_total.is_none() {
            warnings.push(
                ExtractionWarning::new(
                    WarningKind::EmptyPeriod,
                    header,
                    "no readable amounts in this column; period skipped",
                )
                .for_period(period),
            );
            continue;
        }

        let record = RevenueRecord::assemble(period, amounts, reported_total, tolerance, flags);
        for flag in &record.flags {
            let message = match flag {
                RecordFlag::TotalMismatch {
                    reported,
                    segment_sum,
                } => format!("reported total {reported} differs from segment sum {segment_sum}"),
                RecordFlag::SumOverflow => "segment amounts are too large to sum".to_string(),
                _ => continue,
            };
            warnings.push(
                ExtractionWarning::new(WarningKind::ExtractionMismatch, header, message)
                    .for_period(period),
            );
        }
        debug!(%period, total = %record.total, flags = record.flags.len(), "assembled record");
        records.push(record);
    }

    if records.is_empty() {
        return Err(RevtrendError::EmptyExtraction(format!(
            "none of the {} period column(s) held readable amounts",
            region.column_count()
        )));
    }

    let series = RevenueSeries::new(unit, records)?;
    info!(
        records = series.len(),
        warnings = warnings.len(),
        unit = %unit,
        "extracted revenue series"
    );
    Ok(Extraction { series, warnings })
}

fn classify_rows(
    region: &TableRegion,
    matcher: &LabelMatcher,
    warnings: &mut Vec<ExtractionWarning>,
) -> Vec<RowRole> {
    let mut seen: HashSet<RowKind> = HashSet::new();
    let mut roles = Vec::with_capacity(region.row_count());

    for (r, row) in region.rows().iter().enumerate() {
        let role = match matcher.classify(&row.label) {
            Ok(kind) => {
                if seen.insert(kind) {
                    match kind {
                        RowKind::Segment(s) => RowRole::Segment(s),
                        RowKind::Total => RowRole::Total,
                    }
                } else {
                    warnings.push(ExtractionWarning::new(
                        WarningKind::ExtractionMismatch,
                        row.location,
                        format!("second '{}' row ignored; first occurrence kept", row.label),
                    ));
                    RowRole::Duplicate(kind)
                }
            }
            Err(unknown) => {
                let has_numbers = (0..region.column_count())
                    .filter_map(|c| region.cell(r, c))
                    .any(|raw| values::normalize_amount(raw).is_ok());
                if has_numbers {
                    warnings.push(ExtractionWarning::new(
                        WarningKind::UnknownSegment,
                        row.location,
                        format!("row skipped: {unknown}"),
                    ));
                }
                RowRole::Ignored
            }
        };
        roles.push(role);
    }

    roles
}
