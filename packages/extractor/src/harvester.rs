//! Main extraction service that ties all components together.

use reqwest::blocking::Client;

use crate::config::{ExtractorConfig, RUN_DIR_PREFIX, TEMP_FILE_NAME};
use crate::error::Result;
use crate::http::create_client;
use crate::links::harvest_links;
use crate::pdf::{PdfTableSource, TableSource};
use crate::pipeline::fetch_all;
use crate::types::{LinkEntry, ResultSet};

/// Harvest all report links and extract every report.
///
/// # Returns
/// The metric records keyed by facility. The set is empty when the source
/// page could not be read or no report could be downloaded.
pub fn extract_all(config: &ExtractorConfig) -> Result<ResultSet> {
    let client = create_client(config)?;
    let links = find_reports(&client, config)?;
    extract_reports(&client, config, &links, &PdfTableSource)
}

/// Harvest the report links from the configured source page.
pub fn find_reports(client: &Client, config: &ExtractorConfig) -> Result<Vec<LinkEntry>> {
    let links = harvest_links(client, &config.source_url)?;
    tracing::info!(count = links.len(), url = %config.source_url, "Found links on page");
    Ok(links)
}

/// Download and extract the given reports.
///
/// Without a configured temp directory the download buffer lives in a
/// directory of its own, so concurrent runs don't share it.
pub fn extract_reports(
    client: &Client,
    config: &ExtractorConfig,
    links: &[LinkEntry],
    source: &impl TableSource,
) -> Result<ResultSet> {
    let run_dir;
    let temp_file = match config.temp_file() {
        Some(path) => path,
        None => {
            run_dir = tempfile::Builder::new().prefix(RUN_DIR_PREFIX).tempdir()?;
            run_dir.path().join(TEMP_FILE_NAME)
        }
    };
    tracing::debug!(file = %temp_file.display(), "Download buffer");

    let results = fetch_all(client, links, source, &temp_file);
    tracing::info!(facilities = results.len(), "Extracted data");
    Ok(results)
}
