//! Error types for the extractor.
//!
//! Most failures in a run are recoverable and degrade to log lines and
//! absent data. `ExtractorError` covers the ones that surface through a
//! `Result`, either to the component that downgrades them or to the CLI.

use thiserror::Error;

/// Main error type for the extractor library.
#[derive(Debug, Error)]
pub enum ExtractorError {
    /// HTTP request failed before a response was received.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("Download of {url} failed with status {status}")]
    Download { url: String, status: u16 },

    /// CSS selector could not be compiled.
    #[error("Invalid CSS selector '{0}'")]
    Selector(String),

    /// PDF could not be loaded or its content decoded.
    #[error("PDF parsing failed: {0}")]
    Pdf(#[from] lopdf::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for extractor operations.
pub type Result<T> = std::result::Result<T, ExtractorError>;
