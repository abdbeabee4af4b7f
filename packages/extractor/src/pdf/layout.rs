//! Reconstruction of table rows and columns from positioned text runs.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use super::content::TextRun;
use crate::config::{COLUMN_TOLERANCE, MAX_TABLE_GAP_ROWS, ROW_TOLERANCE};

/// Rows with fewer cells are not table rows.
const MIN_TABLE_COLUMNS: usize = 2;

/// A table needs at least this many multi-cell rows.
const MIN_TABLE_ROWS: usize = 2;

/// Two or more spaces inside a run separate cells.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static CELL_GAP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s{2,}").expect("valid regex"));

/// A rectangular table of cell texts; missing cells are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Create a table from rows of cells.
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Cell text at `row`, `column` (both 0-based).
    #[must_use]
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column).map(String::as_str)
    }
}

/// A cell candidate on a line.
#[derive(Debug, Clone, PartialEq)]
struct Cell {
    start: f64,
    end: f64,
    text: String,
}

/// Cells sharing a baseline.
#[derive(Debug, Clone, PartialEq)]
struct Line {
    page: u32,
    cells: Vec<Cell>,
}

impl Line {
    fn is_table_row(&self) -> bool {
        self.cells.len() >= MIN_TABLE_COLUMNS
    }
}

/// Find the first table in a document's text runs.
///
/// Runs are grouped into lines by baseline. The first block of consecutive
/// multi-cell lines on one page forms the table; up to
/// [`MAX_TABLE_GAP_ROWS`] single-cell lines may sit inside it. Columns are
/// derived from the most common line shape of the block, and the table
/// starts at the first line whose cells sit on those columns.
pub fn first_table(runs: &[TextRun]) -> Option<Table> {
    let lines = group_lines(runs);
    let (block, columns) = find_table(&lines)?;

    let rows = block
        .iter()
        .map(|line| {
            let mut row = vec![String::new(); columns.len()];
            for cell in &line.cells {
                let slot = &mut row[column_of(cell, &columns)];
                if !slot.is_empty() {
                    slot.push(' ');
                }
                slot.push_str(&cell.text);
            }
            row
        })
        .collect();

    Some(Table::new(rows))
}

/// Group runs into lines, top to bottom per page, cells left to right.
fn group_lines(runs: &[TextRun]) -> Vec<Line> {
    let mut pages: BTreeMap<u32, Vec<&TextRun>> = BTreeMap::new();
    for run in runs {
        pages.entry(run.page).or_default().push(run);
    }

    let mut lines = Vec::new();
    for (page, mut page_runs) in pages {
        page_runs.sort_by(|a, b| b.y.total_cmp(&a.y).then(a.x.total_cmp(&b.x)));

        let mut current: Vec<&TextRun> = Vec::new();
        let mut baseline = f64::NAN;
        for run in page_runs {
            if !current.is_empty() && (baseline - run.y).abs() > ROW_TOLERANCE {
                lines.push(make_line(page, &mut current));
            }
            if current.is_empty() {
                baseline = run.y;
            }
            current.push(run);
        }
        if !current.is_empty() {
            lines.push(make_line(page, &mut current));
        }
    }

    lines
}

fn make_line(page: u32, runs: &mut Vec<&TextRun>) -> Line {
    runs.sort_by(|a, b| a.x.total_cmp(&b.x));
    let cells = runs.drain(..).flat_map(split_run).collect();
    Line { page, cells }
}

/// Split a run on wide gaps into separate cells.
fn split_run(run: &TextRun) -> Vec<Cell> {
    let mut parts = Vec::new();
    let mut last = 0;
    for gap in CELL_GAP.find_iter(&run.text) {
        parts.push((last, &run.text[last..gap.start()]));
        last = gap.end();
    }
    parts.push((last, &run.text[last..]));

    parts
        .into_iter()
        .filter_map(|(offset, part)| {
            let text = part.trim();
            if text.is_empty() {
                return None;
            }
            let leading = part.len() - part.trim_start().len();
            let chars_before = run.text[..offset + leading].chars().count() as f64;
            let start = run.x + chars_before * run.char_width;
            Some(Cell {
                start,
                end: start + text.chars().count() as f64 * run.char_width,
                text: text.to_string(),
            })
        })
        .collect()
}

/// First block that still holds a table once lines off its column grid
/// are dropped from the top.
fn find_table(lines: &[Line]) -> Option<(&[Line], Vec<(f64, f64)>)> {
    let mut from = 0;
    while let Some((start, end)) = find_block(lines, from) {
        let block = &lines[start..=end];
        let columns = column_bounds(block);
        let skip = block
            .iter()
            .position(|line| fits_grid(line, &columns))
            .unwrap_or(block.len());
        let table = &block[skip..];

        if table.iter().filter(|l| l.is_table_row()).count() >= MIN_TABLE_ROWS {
            if skip > 0 {
                tracing::debug!(lines = skip, "Dropped lines above table that don't match its columns");
            }
            return Some((table, column_bounds(table)));
        }
        from = end + 1;
    }
    None
}

/// Whether every cell of a table row overlaps a column of its own.
fn fits_grid(line: &Line, columns: &[(f64, f64)]) -> bool {
    if !line.is_table_row() {
        return false;
    }

    let mut used = vec![false; columns.len()];
    line.cells.iter().all(|cell| {
        let overlaps = columns
            .iter()
            .any(|&(start, end)| cell.end.min(end) > cell.start.max(start));
        let column = column_of(cell, columns);
        let free = !std::mem::replace(&mut used[column], true);
        overlaps && free
    })
}

/// First block of consecutive table rows on one page, searching from
/// line `from`. Returns the first and last line index.
fn find_block(lines: &[Line], from: usize) -> Option<(usize, usize)> {
    let mut i = from;
    while i < lines.len() {
        if !lines[i].is_table_row() {
            i += 1;
            continue;
        }

        let start = i;
        let mut end = i;
        let mut table_rows = 1;
        let mut gap = 0;
        for (j, line) in lines.iter().enumerate().skip(start + 1) {
            if line.page != lines[start].page {
                break;
            }
            if line.is_table_row() {
                end = j;
                table_rows += 1;
                gap = 0;
            } else {
                gap += 1;
                if gap > MAX_TABLE_GAP_ROWS {
                    break;
                }
            }
        }

        if table_rows >= MIN_TABLE_ROWS {
            return Some((start, end));
        }
        i = end + 1;
    }
    None
}

/// Horizontal extents of the block's columns.
///
/// Taken from the lines with the most common cell count, merging cell
/// extents that overlap within [`COLUMN_TOLERANCE`]. A column needs cells
/// from at least [`MIN_TABLE_ROWS`] of those lines, so a stray line of the
/// same shape does not add columns of its own.
fn column_bounds(block: &[Line]) -> Vec<(f64, f64)> {
    let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
    for line in block.iter().filter(|l| l.is_table_row()) {
        *counts.entry(line.cells.len()).or_default() += 1;
    }
    // ties go to the wider shape
    let (shape, shape_lines) = counts
        .iter()
        .max_by_key(|(cells, count)| (**count, **cells))
        .map_or((MIN_TABLE_COLUMNS, 0), |(cells, count)| (*cells, *count));

    let mut extents: Vec<(f64, f64)> = block
        .iter()
        .filter(|l| l.cells.len() == shape)
        .flat_map(|l| l.cells.iter().map(|c| (c.start, c.end)))
        .collect();
    extents.sort_by(|a, b| a.0.total_cmp(&b.0));

    // (start, end, cells merged)
    let mut merged: Vec<(f64, f64, usize)> = Vec::new();
    for (start, end) in extents {
        match merged.last_mut() {
            Some(last) if start <= last.1 + COLUMN_TOLERANCE => {
                last.1 = last.1.max(end);
                last.2 += 1;
            }
            _ => merged.push((start, end, 1)),
        }
    }

    let support = shape_lines.min(MIN_TABLE_ROWS);
    let columns: Vec<(f64, f64)> = merged
        .iter()
        .filter(|(_, _, cells)| *cells >= support)
        .map(|&(start, end, _)| (start, end))
        .collect();

    if columns.is_empty() {
        merged.into_iter().map(|(start, end, _)| (start, end)).collect()
    } else {
        columns
    }
}

/// Column index for a cell: largest overlap, else nearest centre.
fn column_of(cell: &Cell, columns: &[(f64, f64)]) -> usize {
    let centre = (cell.start + cell.end) / 2.0;

    columns
        .iter()
        .enumerate()
        .map(|(i, &(start, end))| {
            let overlap = (cell.end.min(end) - cell.start.max(start)).max(0.0);
            let distance = ((start + end) / 2.0 - centre).abs();
            (i, overlap, distance)
        })
        .max_by(|a, b| a.1.total_cmp(&b.1).then(b.2.total_cmp(&a.2)))
        .map_or(0, |(i, _, _)| i)
}
