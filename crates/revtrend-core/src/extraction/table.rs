use tracing::debug;

use crate::diagnostics::{ExtractionWarning, SourceLocation, WarningKind};
use crate::error::RevtrendError;
use crate::extraction::PageContent;
use crate::model::{FiscalPeriod, ReportingUnit};
use crate::parsing::layout::{layout_rows, Cell, LayoutRow};
use crate::parsing::normalize::LabelMatcher;
use crate::parsing::period::{find_fiscal_year_tokens, find_period_tokens, find_quarter_tokens};
use crate::profile::schema::ProfileDef;

/// Lines above the header searched for a "($ in millions)" unit note.
const UNIT_LOOKBEHIND: usize = 5;

/// Lines below a bare-quarter header searched for the fiscal-year line.
const STACKED_HEADER_LOOKAHEAD: usize = 2;

/// A period column established by the table header, with its character span.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodColumn {
    pub period: FiscalPeriod,
    pub start: usize,
    pub end: usize,
}

/// A table body row with one optional cell per period column.
#[derive(Debug, Clone)]
pub struct TableRow {
    pub location: SourceLocation,
    pub label: String,
    pub cells: Vec<Option<String>>,
}

/// The located revenue table: period columns, body rows, and the base unit
/// the document states. Cells are addressed by (row, column).
#[derive(Debug, Clone)]
pub struct TableRegion {
    header: SourceLocation,
    unit: ReportingUnit,
    columns: Vec<PeriodColumn>,
    rows: Vec<TableRow>,
    warnings: Vec<ExtractionWarning>,
}

impl TableRegion {
    pub fn header_location(&self) -> SourceLocation {
        self.header
    }

    pub fn unit(&self) -> ReportingUnit {
        self.unit
    }

    pub fn columns(&self) -> &[PeriodColumn] {
        &self.columns
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn period(&self, column: usize) -> Option<FiscalPeriod> {
        self.columns.get(column).map(|c| c.period)
    }

    pub fn row_label(&self, row: usize) -> Option<&str> {
        self.rows.get(row).map(|r| r.label.as_str())
    }

    /// Raw text of the cell at (row, column), if the row has one there.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.cells.get(column)?.as_deref()
    }

    /// Issues found while placing cells under columns.
    pub fn warnings(&self) -> &[ExtractionWarning] {
        &self.warnings
    }
}

#[derive(Debug)]
struct Header {
    columns: Vec<PeriodColumn>,
    /// Number of lines the header occupies.
    height: usize,
}

#[derive(Debug)]
struct Candidate {
    header_row: usize,
    columns: Vec<PeriodColumn>,
    body: Vec<usize>,
    segment_rows: usize,
}

/// Candidate ranking, compared field by field in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct TableScore {
    contiguous_run: usize,
    monotonic: bool,
    period_columns: usize,
    segment_rows: usize,
}

/// Find the segment revenue table in a document.
///
/// A table starts at a row carrying at least `min_period_columns` period
/// labels and runs until `max_unmatched_run` consecutive non-blank rows fail
/// to match a segment or total label. When several tables qualify, the one
/// whose headers form the longest contiguous quarter run wins; ties go to
/// the table that appears first.
pub fn locate_table(
    pages: &[PageContent],
    profile: &ProfileDef,
) -> Result<TableRegion, RevtrendError> {
    let matcher = LabelMatcher::from_profile(profile);
    let rows = layout_rows(pages);
    let candidates = find_candidates(&rows, &matcher, profile);

    if candidates.is_empty() {
        return Err(RevtrendError::TableNotFound(format!(
            "no header row with at least {} period column(s) found",
            profile.min_period_columns
        )));
    }

    let mut best: Option<(TableScore, &Candidate)> = None;
    for candidate in &candidates {
        if candidate.segment_rows < profile.min_segment_rows {
            debug!(
                header_line = rows[candidate.header_row].line_index,
                segment_rows = candidate.segment_rows,
                "table candidate rejected: too few segment rows"
            );
            continue;
        }
        let score = score(candidate);
        debug!(
            page = rows[candidate.header_row].page_number,
            header_line = rows[candidate.header_row].line_index,
            ?score,
            "table candidate"
        );
        if best.as_ref().map_or(true, |(b, _)| score > *b) {
            best = Some((score, candidate));
        }
    }

    let Some((_, chosen)) = best else {
        return Err(RevtrendError::TableNotFound(format!(
            "{} candidate table(s) found but none had at least {} recognized segment row(s)",
            candidates.len(),
            profile.min_segment_rows
        )));
    };

    let region = build_region(&rows, chosen, profile);
    debug!(
        header = %region.header,
        columns = region.columns.len(),
        rows = region.rows.len(),
        unit = %region.unit,
        "located revenue table"
    );
    Ok(region)
}

fn find_candidates(
    rows: &[LayoutRow],
    matcher: &LabelMatcher,
    profile: &ProfileDef,
) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    let mut i = 0;

    while i < rows.len() {
        let Some(header) = detect_header(rows, i, profile.min_period_columns) else {
            i += 1;
            continue;
        };

        let body_start = i + header.height;
        let mut body = Vec::new();
        let mut segment_rows = 0;
        let mut unmatched_run = 0;
        let mut last_matched: Option<usize> = None;
        let mut next = None;

        let mut j = body_start;
        while j < rows.len() {
            let row = &rows[j];
            if row.is_blank() {
                j += 1;
                continue;
            }
            if detect_header(rows, j, profile.min_period_columns).is_some() {
                next = Some(j);
                break;
            }
            match row.label().map(|l| matcher.classify(l)) {
                Some(Ok(kind)) => {
                    if matches!(kind, crate::model::RowKind::Segment(_)) {
                        segment_rows += 1;
                    }
                    last_matched = Some(j);
                    unmatched_run = 0;
                }
                _ => {
                    unmatched_run += 1;
                    if unmatched_run >= profile.max_unmatched_run {
                        break;
                    }
                }
            }
            body.push(j);
            j += 1;
        }

        // Trailing unmatched rows (footnotes) are not part of the table.
        if let Some(last) = last_matched {
            body.retain(|&r| r <= last);
        } else {
            body.clear();
        }

        candidates.push(Candidate {
            header_row: i,
            columns: header.columns,
            body,
            segment_rows,
        });

        i = next.unwrap_or_else(|| last_matched.map_or(body_start, |last| last + 1));
    }

    candidates
}

/// A header is a row with enough period labels, or a row of bare quarter
/// markers followed shortly by a row with the same number of fiscal years.
fn detect_header(rows: &[LayoutRow], i: usize, min_columns: usize) -> Option<Header> {
    let row = &rows[i];
    let tokens = find_period_tokens(&row.text);
    if tokens.len() >= min_columns && !tokens.is_empty() {
        return Some(Header {
            columns: tokens
                .into_iter()
                .map(|t| PeriodColumn {
                    period: t.period,
                    start: t.start,
                    end: t.end,
                })
                .collect(),
            height: 1,
        });
    }

    let quarters = find_quarter_tokens(&row.text);
    if quarters.len() < min_columns.max(1) || !tokens.is_empty() {
        return None;
    }

    for k in (i + 1)..rows.len().min(i + 1 + STACKED_HEADER_LOOKAHEAD) {
        let years = find_fiscal_year_tokens(&rows[k].text);
        if years.len() == quarters.len() {
            let columns = quarters
                .iter()
                .zip(&years)
                .filter_map(|(&(quarter, qs, qe), &(year, ys, ye))| {
                    Some(PeriodColumn {
                        period: FiscalPeriod::new(year, quarter).ok()?,
                        start: qs.min(ys),
                        end: qe.max(ye),
                    })
                })
                .collect();
            return Some(Header {
                columns,
                height: k - i + 1,
            });
        }
        if !rows[k].is_blank() {
            break;
        }
    }

    None
}

fn score(candidate: &Candidate) -> TableScore {
    let steps: Vec<i64> = candidate
        .columns
        .windows(2)
        .map(|w| w[0].period.quarters_until(w[1].period))
        .collect();

    let mut longest = candidate.columns.len().min(1);
    let mut run = 1;
    let mut direction = 0;
    for &step in &steps {
        if step.abs() == 1 {
            if direction == 0 || step == direction {
                run += 1;
            } else {
                run = 2;
            }
            direction = step;
        } else {
            run = 1;
            direction = 0;
        }
        longest = longest.max(run);
    }

    let monotonic = !steps.is_empty()
        && (steps.iter().all(|&s| s > 0) || steps.iter().all(|&s| s < 0));

    TableScore {
        contiguous_run: longest,
        monotonic,
        period_columns: candidate.columns.len(),
        segment_rows: candidate.segment_rows,
    }
}

fn build_region(rows: &[LayoutRow], candidate: &Candidate, profile: &ProfileDef) -> TableRegion {
    let header_row = &rows[candidate.header_row];
    let header = SourceLocation {
        page_number: header_row.page_number,
        line_index: header_row.line_index,
    };

    let unit = rows[candidate.header_row.saturating_sub(UNIT_LOOKBEHIND)..=candidate.header_row]
        .iter()
        .rev()
        .find_map(|r| ReportingUnit::from_str_loose(&r.text))
        .unwrap_or(profile.default_unit);

    let mut warnings = Vec::new();
    let table_rows = candidate
        .body
        .iter()
        .map(|&r| {
            let row = &rows[r];
            let location = SourceLocation {
                page_number: row.page_number,
                line_index: row.line_index,
            };
            let cells = assign_cells(row.value_cells(), &candidate.columns, location, &mut warnings);
            TableRow {
                location,
                label: row.label().unwrap_or_default().to_string(),
                cells,
            }
        })
        .collect();

    TableRegion {
        header,
        unit,
        columns: candidate.columns.clone(),
        rows: table_rows,
        warnings,
    }
}

/// Place value cells under period columns. Rows with exactly one cell per
/// column are read positionally; otherwise each cell goes to the nearest
/// column, and a cell whose column is already taken is reported.
fn assign_cells(
    values: &[Cell],
    columns: &[PeriodColumn],
    location: SourceLocation,
    warnings: &mut Vec<ExtractionWarning>,
) -> Vec<Option<String>> {
    if values.len() == columns.len() {
        return values.iter().map(|c| Some(c.text.clone())).collect();
    }

    let mut slots: Vec<Option<String>> = vec![None; columns.len()];
    for cell in values {
        let nearest = columns.iter().enumerate().min_by(|(_, a), (_, b)| {
            let da = (cell.distance_to(a.start, a.end), center_distance(cell, a));
            let db = (cell.distance_to(b.start, b.end), center_distance(cell, b));
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        });
        let Some((index, column)) = nearest else {
            continue;
        };
        if slots[index].is_some() {
            warnings.push(
                ExtractionWarning::new(
                    WarningKind::AmbiguousCell,
                    location,
                    format!("cell '{}' collides with another value in its column", cell.text),
                )
                .for_period(column.period),
            );
            continue;
        }
        slots[index] = Some(cell.text.clone());
    }
    slots
}

fn center_distance(cell: &Cell, column: &PeriodColumn) -> f32 {
    let column_center = (column.start + column.end) as f32 / 2.0;
    (cell.center() - column_center).abs()
}
