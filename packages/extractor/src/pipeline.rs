//! Download and extraction loop over the harvested report links.

use std::fs;
use std::path::Path;

use reqwest::blocking::Client;

use crate::http::download_bytes;
use crate::pdf::{extract_record, TableSource};
use crate::types::{LinkEntry, ResultSet};

/// Download every report and extract its metrics.
///
/// Reports are processed one after the other through the same `temp_file`,
/// which is removed after each extraction. Failed downloads are logged and
/// the facility is left out of the result.
pub fn fetch_all(
    client: &Client,
    links: &[LinkEntry],
    source: &impl TableSource,
    temp_file: &Path,
) -> ResultSet {
    let mut results = ResultSet::new();

    for link in links {
        tracing::info!(facility = %link.facility, url = %link.url, "Download file");

        let bytes = match download_bytes(client, &link.url) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!(
                    facility = %link.facility,
                    url = %link.url,
                    error = %e,
                    "Can't download report"
                );
                continue;
            }
        };

        if let Err(e) = fs::write(temp_file, &bytes) {
            tracing::error!(
                facility = %link.facility,
                file = %temp_file.display(),
                error = %e,
                "Can't write report to temporary file"
            );
            continue;
        }

        let record = extract_record(source, temp_file);
        tracing::debug!(facility = %link.facility, ?record, "PDF content");
        results.insert(link.facility.clone(), record);

        if let Err(e) = fs::remove_file(temp_file) {
            tracing::warn!(file = %temp_file.display(), error = %e, "Can't remove temporary file");
        }
    }

    results
}
