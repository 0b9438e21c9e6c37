use std::io::Write;

use serde::Serialize;

use crate::error::RevtrendError;
use crate::model::{RevenueSeries, Segment};

#[derive(Serialize)]
struct CsvRow<'a> {
    quarter: String,
    fiscal_year: i32,
    quarter_number: u8,
    data_center: Option<&'a rust_decimal::Decimal>,
    gaming: Option<&'a rust_decimal::Decimal>,
    professional_visualization: Option<&'a rust_decimal::Decimal>,
    automotive: Option<&'a rust_decimal::Decimal>,
    oem_and_other: Option<&'a rust_decimal::Decimal>,
    total: &'a rust_decimal::Decimal,
    total_source: &'static str,
    consistent: bool,
}

/// Write one CSV row per quarter, oldest first. A missing segment amount is
/// an empty field.
pub fn write_csv<W: Write>(series: &RevenueSeries, writer: W) -> Result<(), RevtrendError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for record in series {
        let amount = |s: Segment| record.segment_amounts.get(&s);
        wtr.serialize(CsvRow {
            quarter: record.period.to_string(),
            fiscal_year: record.period.year(),
            quarter_number: record.period.quarter(),
            data_center: amount(Segment::DataCenter),
            gaming: amount(Segment::Gaming),
            professional_visualization: amount(Segment::ProfessionalVisualization),
            automotive: amount(Segment::Automotive),
            oem_and_other: amount(Segment::OemAndOther),
            total: &record.total,
            total_source: record.total_source.as_str(),
            consistent: record.is_consistent(),
        })?;
    }
    wtr.flush()?;
    Ok(())
}
