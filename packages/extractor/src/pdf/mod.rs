//! Table extraction from water-quality reports.
//!
//! The report's first table lists one parameter per row. The metrics sit at
//! fixed row indices ([`TABLE_ROW_INDICES`]) in a fixed value column
//! ([`VALUE_COLUMN_INDEX`]).
//!
//! Table detection is behind the [`TableSource`] trait; [`PdfTableSource`]
//! reads the text layout of the PDF with `lopdf`.

pub mod content;
pub mod layout;

use std::path::Path;

use lopdf::Document;

pub use content::{page_runs, TextRun};
pub use layout::{first_table, Table};

use crate::config::{TABLE_ROW_INDICES, VALUE_COLUMN_INDEX};
use crate::error::Result;
use crate::record::map_row;
use crate::types::MetricRecord;

/// Something that can locate the first table of a report file.
pub trait TableSource {
    /// Return the first table of the document at `path`, if it has one.
    fn first_table(&self, path: &Path) -> Result<Option<Table>>;
}

/// [`TableSource`] reading the PDF text layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTableSource;

impl TableSource for PdfTableSource {
    fn first_table(&self, path: &Path) -> Result<Option<Table>> {
        let doc = Document::load(path)?;
        Ok(first_table_in_document(&doc))
    }
}

/// First table of an already loaded document.
///
/// Pages are read in order until one holds a table. Pages whose content
/// can't be decoded are logged and skipped.
pub fn first_table_in_document(doc: &Document) -> Option<Table> {
    doc.get_pages().into_iter().find_map(|(page, page_id)| {
        match page_runs(doc, page, page_id) {
            Ok(runs) => first_table(&runs),
            Err(e) => {
                tracing::warn!(page, error = %e, "Can't decode page content, skipping page");
                None
            }
        }
    })
}

/// Pick the metric cells from the table, in record field order.
///
/// Rows or cells missing from the table are left out, so the result is
/// shorter than eight values for tables that do not match the layout.
pub fn extract_values(table: &Table) -> Vec<String> {
    TABLE_ROW_INDICES
        .iter()
        .filter_map(|&row| table.cell(row, VALUE_COLUMN_INDEX))
        .map(str::to_string)
        .collect()
}

/// Extract the metric record of the report at `path`.
///
/// Never fails: unreadable files and files without a table give an empty
/// record and an error log.
pub fn extract_record(source: &impl TableSource, path: &Path) -> MetricRecord {
    match source.first_table(path) {
        Ok(Some(table)) => {
            tracing::info!(file = %path.display(), rows = table.row_count(), "Read data from file");
            map_row(&extract_values(&table))
        }
        Ok(None) => {
            tracing::error!(file = %path.display(), "No table found in report");
            MetricRecord::Empty {}
        }
        Err(e) => {
            tracing::error!(file = %path.display(), error = %e, "Can't read report");
            MetricRecord::Empty {}
        }
    }
}
