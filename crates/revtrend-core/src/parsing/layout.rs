use crate::extraction::PageContent;

/// A run of text within a layout line, with its character column span.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

impl Cell {
    /// Columns between two spans; zero when they overlap.
    pub fn distance_to(&self, start: usize, end: usize) -> usize {
        if self.end <= start {
            start - self.end
        } else if end <= self.start {
            self.start - end
        } else {
            0
        }
    }

    pub fn center(&self) -> f32 {
        (self.start + self.end) as f32 / 2.0
    }
}

/// One line of a page, split into cells.
#[derive(Debug, Clone)]
pub struct LayoutRow {
    pub page_number: usize,
    pub line_index: usize,
    pub text: String,
    pub cells: Vec<Cell>,
}

impl LayoutRow {
    pub fn is_blank(&self) -> bool {
        self.cells.is_empty()
    }

    /// The leading cell when it reads as a label (starts with a letter).
    pub fn label(&self) -> Option<&str> {
        let first = self.cells.first()?;
        if first.text.chars().next()?.is_alphabetic() {
            Some(first.text.as_str())
        } else {
            None
        }
    }

    /// Cells after the label (all cells when the row has no label).
    pub fn value_cells(&self) -> &[Cell] {
        if self.label().is_some() {
            &self.cells[1..]
        } else {
            &self.cells
        }
    }
}

/// Flatten pages into layout rows in reading order.
pub fn layout_rows(pages: &[PageContent]) -> Vec<LayoutRow> {
    pages
        .iter()
        .flat_map(|page| {
            page.lines
                .iter()
                .enumerate()
                .map(move |(line_index, line)| LayoutRow {
                    page_number: page.page_number,
                    line_index,
                    text: line.clone(),
                    cells: split_cells(line),
                })
        })
        .collect()
}

/// Split a line by gaps of 2+ whitespace characters (a tab counts as two).
///
/// A cell holding only a currency symbol is merged into the cell after it,
/// since layout output often pads "$" away from its number.
pub fn split_cells(line: &str) -> Vec<Cell> {
    let chars: Vec<char> = line.chars().collect();
    let mut cells = Vec::new();
    let mut start: Option<usize> = None;
    let mut gap_start: Option<usize> = None;
    let mut gap_weight = 0;

    for (i, c) in chars.iter().enumerate() {
        if c.is_whitespace() {
            if gap_start.is_none() {
                gap_start = Some(i);
            }
            gap_weight += if *c == '\t' { 2 } else { 1 };
            if gap_weight >= 2 {
                if let (Some(s), Some(g)) = (start, gap_start) {
                    cells.push(make_cell(&chars, s, g));
                    start = None;
                }
            }
        } else {
            if start.is_none() {
                start = Some(i);
            }
            gap_start = None;
            gap_weight = 0;
        }
    }

    if let Some(s) = start {
        cells.push(make_cell(&chars, s, chars.len()));
    }

    merge_currency_cells(cells)
}

fn make_cell(chars: &[char], start: usize, end: usize) -> Cell {
    let raw: String = chars[start..end].iter().collect();
    let text = raw.trim_end().to_string();
    let end = start + text.chars().count();
    Cell { text, start, end }
}

fn merge_currency_cells(cells: Vec<Cell>) -> Vec<Cell> {
    let mut merged: Vec<Cell> = Vec::with_capacity(cells.len());
    let mut pending: Option<Cell> = None;

    for cell in cells {
        match pending.take() {
            Some(symbol) => merged.push(Cell {
                text: format!("{}{}", symbol.text, cell.text),
                start: symbol.start,
                end: cell.end,
            }),
            None if is_currency_only(&cell.text) => pending = Some(cell),
            None => merged.push(cell),
        }
    }

    if let Some(symbol) = pending {
        merged.push(symbol);
    }
    merged
}

fn is_currency_only(s: &str) -> bool {
    matches!(s, "$" | "US$" | "USD" | "€" | "£" | "¥")
}
