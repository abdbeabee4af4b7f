//! Configuration constants for the extractor.
//!
//! The row and column indices below encode the fixed layout of the LWG
//! water-quality report. A change in that layout should only require an
//! edit here.

use std::path::PathBuf;
use std::time::Duration;

/// Page listing the water-quality reports of all facilities.
pub const SOURCE_URL: &str =
    "https://lausitzer-wasser.de/de/kundenportal/trinkwasser/wasserqualitaet-wasserhaerte.html";

/// HTTP timeout in seconds.
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// CSS selector of the block holding the report downloads.
pub const DOWNLOADS_SELECTOR: &str = "div.boxWrap.downloads";

/// CSS selector of a report link inside the downloads block.
pub const REPORT_LINK_SELECTOR: &str = "a.hasImg";

/// Separator between the "Wasserwerk" prefix and the facility name in a link title.
pub const TITLE_SEPARATOR: char = '–';

/// Table rows (0-based, first table of the report) holding the metrics,
/// in record field order.
pub const TABLE_ROW_INDICES: [usize; 8] = [2, 11, 12, 13, 14, 15, 16, 17];

/// Table column (0-based) holding the measured value.
pub const VALUE_COLUMN_INDEX: usize = 4;

/// Vertical distance (PDF units) within which text runs share a table row.
pub const ROW_TOLERANCE: f64 = 2.0;

/// Horizontal slack (PDF units) when merging cell extents into columns.
pub const COLUMN_TOLERANCE: f64 = 1.0;

/// Single-cell rows tolerated inside a table before it is considered ended.
pub const MAX_TABLE_GAP_ROWS: usize = 2;

/// File name of the reusable download buffer.
pub const TEMP_FILE_NAME: &str = "lwg-extractor-report.pdf";

/// Name prefix of the per-run directory holding the download buffer.
pub const RUN_DIR_PREFIX: &str = "lwg-extractor-";

/// Runtime settings for one extraction run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractorConfig {
    /// Page the report links are harvested from.
    pub source_url: String,

    /// Limit for each HTTP request, body included.
    pub http_timeout: Duration,

    /// Directory of the download buffer [`TEMP_FILE_NAME`].
    ///
    /// `None` gives every run a fresh directory under the system temp
    /// directory, removed when the run ends.
    pub temp_dir: Option<PathBuf>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            source_url: SOURCE_URL.to_string(),
            http_timeout: Duration::from_secs(HTTP_TIMEOUT_SECS),
            temp_dir: None,
        }
    }
}

impl ExtractorConfig {
    /// Use a different source page.
    #[must_use]
    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = url.into();
        self
    }

    #[must_use]
    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    /// Download reports into `dir` instead of a per-run directory.
    #[must_use]
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    /// Buffer path inside the configured directory, if one is set.
    #[must_use]
    pub fn temp_file(&self) -> Option<PathBuf> {
        self.temp_dir.as_deref().map(|dir| dir.join(TEMP_FILE_NAME))
    }
}
