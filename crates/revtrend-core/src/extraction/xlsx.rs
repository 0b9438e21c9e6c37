use std::io::Cursor;

use calamine::{Reader, Xlsx};

use crate::error::RevtrendError;
use crate::extraction::{DocumentExtractor, PageContent};

/// Spaces between rendered spreadsheet columns. Two or more keeps columns
/// apart for the layout cell splitter.
const COLUMN_GAP: usize = 3;

/// Spreadsheet backend. Each worksheet becomes one page whose lines are the
/// sheet rows rendered as fixed-width layout text, so the table locator
/// reads a workbook the same way it reads `pdftotext -layout` output.
pub struct XlsxExtractor;

impl XlsxExtractor {
    pub fn new() -> Self {
        XlsxExtractor
    }
}

impl Default for XlsxExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentExtractor for XlsxExtractor {
    fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<PageContent>, RevtrendError> {
        let cursor = Cursor::new(bytes);
        let mut workbook: Xlsx<_> = calamine::open_workbook_from_rs(cursor)
            .map_err(|e| RevtrendError::Spreadsheet(format!("failed to open xlsx: {e}")))?;

        let mut pages = Vec::new();
        for (i, name) in workbook.sheet_names().into_iter().enumerate() {
            let sheet = workbook.worksheet_range(&name).map_err(|e| {
                RevtrendError::Spreadsheet(format!("failed to read sheet '{name}': {e}"))
            })?;

            let grid: Vec<Vec<String>> = sheet
                .rows()
                .map(|row| row.iter().map(cell_as_string).collect())
                .collect();

            tracing::debug!(sheet = %name, rows = grid.len(), "rendered worksheet");
            pages.push(PageContent {
                page_number: i + 1,
                lines: render_layout(&grid),
            });
        }

        Ok(pages)
    }

    fn backend_name(&self) -> &str {
        "xlsx"
    }
}

/// Pad every column to its widest cell so values line up under headers.
fn render_layout(grid: &[Vec<String>]) -> Vec<String> {
    let columns = grid.iter().map(|row| row.len()).max().unwrap_or(0);
    let mut widths = vec![0; columns];
    for row in grid {
        for (c, cell) in row.iter().enumerate() {
            widths[c] = widths[c].max(cell.chars().count());
        }
    }

    grid.iter()
        .map(|row| {
            let mut line = String::new();
            for (c, width) in widths.iter().enumerate() {
                let cell = row.get(c).map(String::as_str).unwrap_or("");
                line.push_str(cell);
                let pad = width - cell.chars().count() + COLUMN_GAP;
                line.extend(std::iter::repeat(' ').take(pad));
            }
            line.trim_end().to_string()
        })
        .collect()
}

fn cell_as_string(cell: &calamine::Data) -> String {
    match cell {
        calamine::Data::String(s) => s.trim().to_string(),
        // f64 Display drops a zero fraction: 35580.0 renders as "35580".
        calamine::Data::Float(f) => f.to_string(),
        calamine::Data::Int(i) => i.to_string(),
        calamine::Data::Empty => String::new(),
        _ => format!("{cell}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::layout::split_cells;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_render_aligns_columns() {
        let lines = render_layout(&grid(&[
            &["", "Q2 FY25", "Q1 FY25"],
            &["Data Center", "26272", "22563"],
            &["Gaming", "2880", "2647"],
        ]));
        assert_eq!(lines.len(), 3);
        let header = split_cells(&lines[0]);
        let row = split_cells(&lines[1]);
        assert_eq!(header[0].start, row[1].start);
        assert_eq!(header[1].start, row[2].start);
    }

    #[test]
    fn test_empty_cells_keep_alignment() {
        let lines = render_layout(&grid(&[
            &["", "Q2 FY25", "Q1 FY25"],
            &["Automotive", "", "329"],
        ]));
        let header = split_cells(&lines[0]);
        let row = split_cells(&lines[1]);
        assert_eq!(row.len(), 2);
        assert_eq!(row[1].start, header[1].start);
    }

    #[test]
    fn test_cell_as_string() {
        assert_eq!(cell_as_string(&calamine::Data::Float(35580.0)), "35580");
        assert_eq!(cell_as_string(&calamine::Data::Float(12.5)), "12.5");
        assert_eq!(cell_as_string(&calamine::Data::Int(7)), "7");
        assert_eq!(
            cell_as_string(&calamine::Data::String("  Gaming ".into())),
            "Gaming"
        );
        assert_eq!(cell_as_string(&calamine::Data::Empty), "");
    }

    #[test]
    fn test_invalid_bytes_rejected() {
        let result = XlsxExtractor::new().extract_pages(b"not a workbook");
        assert!(matches!(result, Err(RevtrendError::Spreadsheet(_))));
    }
}
