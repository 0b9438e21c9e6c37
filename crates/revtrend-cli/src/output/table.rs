use rust_decimal::{Decimal, RoundingStrategy};

use revtrend_core::growth::GrowthReport;
use revtrend_core::model::{GrowthMetric, ReportingUnit, RevenueSeries, Subject};
use revtrend_core::parsing::Extraction;
use revtrend_core::storage::ImportRecord;

pub fn print_extraction(extraction: &Extraction) {
    print_series(&extraction.series);

    if !extraction.warnings.is_empty() {
        println!("Warnings:");
        for w in &extraction.warnings {
            println!("  {w}");
        }
        println!();
    }
}

/// Quarters as columns, subjects as rows, amounts in the document's unit.
pub fn print_series(series: &RevenueSeries) {
    if series.is_empty() {
        println!("No quarters stored.\n");
        return;
    }

    let unit = series.unit();
    println!("Revenue by segment ($ in {unit})\n");

    let subjects = series.subjects();
    let name_width = subjects
        .iter()
        .map(|s| s.display_name().len())
        .max()
        .unwrap_or(10)
        + 2;

    let cells: Vec<Vec<String>> = subjects
        .iter()
        .map(|&subject| {
            series
                .iter()
                .map(|r| match r.value(subject) {
                    Some(v) => format_amount(v, unit),
                    None => "-".into(),
                })
                .collect()
        })
        .collect();

    let col_width = cells
        .iter()
        .flatten()
        .map(String::len)
        .chain(series.iter().map(|r| r.period.to_string().len()))
        .max()
        .unwrap_or(8);

    print!("  {:<width$}", "", width = name_width);
    for record in series {
        print!("  {:>col_width$}", record.period.to_string());
    }
    println!();
    println!(
        "  {}",
        "-".repeat(name_width + series.len() * (col_width + 2))
    );

    for (subject, row) in subjects.iter().zip(&cells) {
        if *subject == Subject::Total {
            continue;
        }
        print_row(subject.display_name(), row, name_width, col_width);
    }
    if let Some(total_row) = cells.first() {
        print_row("Total", total_row, name_width, col_width);
    }
    println!();

    let flagged: Vec<_> = series.iter().filter(|r| !r.is_consistent()).collect();
    if !flagged.is_empty() {
        println!("Flagged quarters:");
        for record in flagged {
            for flag in &record.flags {
                println!("  {}: {}", record.period, flag);
            }
        }
        println!();
    }

    let gaps = series.gaps();
    if !gaps.is_empty() {
        for (before, after) in gaps {
            println!("  (no data between {before} and {after})");
        }
        println!();
    }
}

fn print_row(name: &str, cells: &[String], name_width: usize, col_width: usize) {
    print!("  {:<name_width$}", name);
    for cell in cells {
        print!("  {:>col_width$}", cell);
    }
    println!();
}

pub fn print_growth(report: &GrowthReport) {
    print_metrics("Quarter over quarter", &report.qoq, format_percent);
    print_metrics("Year over year", &report.yoy, format_percent);
    print_metrics(
        &format!("Compound annual growth from {}", report.baseline),
        &report.cagr,
        format_percent,
    );
    print_metrics(
        "Contribution to total QoQ change",
        &report.contributions,
        format_percent,
    );
    print_metrics(
        &format!("Index ({} = 100)", report.baseline),
        &report.indexed,
        format_index,
    );

    if let Some(last) = report.shares.last().map(|s| s.period) {
        println!("=== Segment share, {last} ===\n");
        for share in report.shares.iter().filter(|s| s.period == last) {
            println!(
                "  {:<28}  {:>8}",
                share.segment.display_name(),
                format_percent(share.share)
            );
        }
        println!();
    }
}

fn print_metrics(title: &str, metrics: &[GrowthMetric], format: fn(Option<f64>) -> String) {
    println!("=== {title} ===\n");
    if metrics.is_empty() {
        println!("  (no comparable periods)\n");
        return;
    }

    let mut periods: Vec<_> = metrics.iter().map(|m| m.period).collect();
    periods.dedup();
    let mut subjects: Vec<Subject> = metrics.iter().map(|m| m.subject).collect();
    subjects.sort();
    subjects.dedup();

    print!("  {:<28}", "");
    for p in &periods {
        print!("  {:>8}", p.to_string());
    }
    println!();

    for subject in subjects {
        print!("  {:<28}", subject.display_name());
        for p in &periods {
            let value = metrics
                .iter()
                .find(|m| m.subject == subject && m.period == *p)
                .and_then(|m| m.value);
            print!("  {:>8}", format(value));
        }
        println!();
    }
    println!();
}

/// Signed percentage with one decimal, "n/a" when undefined.
pub fn format_percent(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:+.1}%"),
        None => "n/a".into(),
    }
}

/// Index level with one decimal, "n/a" when undefined.
pub fn format_index(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.1}"),
        None => "n/a".into(),
    }
}

/// Express an absolute amount in `unit` with thousands separators, e.g.
/// 35_580_000_000 in millions gives "35,580".
pub fn format_amount(amount: Decimal, unit: ReportingUnit) -> String {
    let scaled = (amount / unit.multiplier())
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    let text = scaled.abs().to_string();
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::new();
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if let Some(f) = frac_part {
        grouped.push('.');
        grouped.push_str(f);
    }

    if scaled.is_sign_negative() && !scaled.is_zero() {
        format!("({grouped})")
    } else {
        grouped
    }
}

pub fn print_imports(history: &[ImportRecord]) {
    if history.is_empty() {
        return;
    }
    println!("Imports:");
    for import in history {
        let latest = import
            .latest_period
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".into());
        println!(
            "  {}  {}  {} quarter(s), latest {}",
            import.imported_at, import.source, import.records, latest
        );
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_format_amount_groups_thousands() {
        let amount = Decimal::from(35_580_000_000_i64);
        assert_eq!(format_amount(amount, ReportingUnit::Millions), "35,580");
        assert_eq!(format_amount(amount, ReportingUnit::Billions), "35.58");
    }

    #[test]
    fn test_format_amount_negative_and_small() {
        let amount = Decimal::from_str("-1234500000").unwrap();
        assert_eq!(format_amount(amount, ReportingUnit::Millions), "(1,234.5)");
        assert_eq!(format_amount(Decimal::from(329), ReportingUnit::Units), "329");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(Some(21.0)), "+21.0%");
        assert_eq!(format_percent(Some(-3.26)), "-3.3%");
        assert_eq!(format_percent(None), "n/a");
    }

    #[test]
    fn test_format_index() {
        assert_eq!(format_index(Some(121.0)), "121.0");
        assert_eq!(format_index(None), "n/a");
    }
}
