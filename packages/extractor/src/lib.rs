//! LWG Extractor - water hardness metrics from Lausitzer Wasser reports.
//!
//! This crate reads the water-quality page of Lausitzer Wasser GmbH, downloads
//! the PDF report of every facility ("Wasserwerk") and extracts eight metrics
//! (hardness, calcium, magnesium, sodium, potassium, chloride, nitrate,
//! sulfite) from the first table of each report.
//!
//! # Example
//!
//! ```
//! use lwg_extractor::links::clean_title;
//! use lwg_extractor::record::map_row;
//!
//! assert_eq!(clean_title("Wasserwerk – Tettau (PDF)").as_deref(), Some("Tettau"));
//! assert!(!map_row(&["8,4", "45", "9", "13", "2", "31", "4", "< 10"]).is_empty());
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Configuration constants and run settings
//! - [`types`]: Core data types (LinkEntry, MetricRecord, ResultSet)
//! - [`error`]: Error types and Result alias
//! - [`http`]: HTTP client for the LWG website
//! - [`number`]: Parsing of numeric table cells
//! - [`record`]: Mapping of table values to records
//! - [`links`]: Report link harvesting
//! - [`pdf`]: Table extraction from reports
//! - [`pipeline`]: Download and extraction loop
//! - [`output`]: JSON output
//! - [`cli`]: Command-line interface
//! - [`harvester`]: Main extraction service

pub mod cli;
pub mod config;
pub mod error;
pub mod harvester;
pub mod http;
pub mod links;
pub mod number;
pub mod output;
pub mod pdf;
pub mod pipeline;
pub mod record;
pub mod types;

// Re-export main functions
pub use harvester::extract_all;

// Re-export commonly used items
pub use config::ExtractorConfig;
pub use error::{ExtractorError, Result};
pub use types::{LinkEntry, Measurement, MetricRecord, ResultSet, WaterMetrics};
