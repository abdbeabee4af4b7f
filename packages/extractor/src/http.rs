//! HTTP client wrapper for the LWG website.
//!
//! Requests are made once; failed requests are not retried.

use reqwest::blocking::Client;

use crate::config::ExtractorConfig;
use crate::error::{ExtractorError, Result};

/// User agent string identifying this extractor.
const USER_AGENT: &str = concat!("lwg-extractor/", env!("CARGO_PKG_VERSION"));

/// Build the client shared by the page request and all report downloads.
///
/// The whole request, body included, is bounded by
/// [`ExtractorConfig::http_timeout`].
pub fn create_client(config: &ExtractorConfig) -> Result<Client> {
    Ok(Client::builder()
        .timeout(config.http_timeout)
        .user_agent(USER_AGENT)
        .build()?)
}

/// Download the body of `url`.
///
/// Non-success statuses are reported as `ExtractorError::Download`.
pub fn download_bytes(client: &Client, url: &str) -> Result<Vec<u8>> {
    let response = client.get(url).send()?;
    let status = response.status();
    if !status.is_success() {
        return Err(ExtractorError::Download {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    Ok(response.bytes()?.to_vec())
}

/// Download `url` and decode it as text.
///
/// Invalid UTF-8 sequences are replaced rather than rejected.
pub fn fetch_text(client: &Client, url: &str) -> Result<String> {
    let bytes = download_bytes(client, url)?;
    Ok(bytes_to_string(&bytes, url))
}

/// Convert a response body to a string, logging lossy conversions.
pub fn bytes_to_string(bytes: &[u8], context: &str) -> String {
    match String::from_utf8(bytes.to_vec()) {
        Ok(s) => s,
        Err(_) => {
            tracing::warn!(context, "Response contains invalid UTF-8, replacing");
            String::from_utf8_lossy(bytes).into_owned()
        }
    }
}
