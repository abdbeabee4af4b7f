//! Harvesting of report links from the LWG water-quality page.
//!
//! The page lists one download per facility inside
//! `<div class="boxWrap downloads">`. Each `<a class="hasImg">` carries a
//! title like `Wasserwerk – Tettau (PDF, 120 KB)` and links to the report.

use reqwest::blocking::Client;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::config::{DOWNLOADS_SELECTOR, REPORT_LINK_SELECTOR, TITLE_SEPARATOR};
use crate::error::{ExtractorError, Result};
use crate::http::fetch_text;
use crate::types::LinkEntry;

/// Extract the facility name from a link title.
///
/// # Examples
/// ```
/// use lwg_extractor::links::clean_title;
///
/// assert_eq!(clean_title("Wasserwerk – Ortsname (Info)"), Some("Ortsname".to_string()));
/// assert_eq!(clean_title("Preisblatt 2024"), None);
/// ```
pub fn clean_title(title: &str) -> Option<String> {
    let title = title.trim();

    let Some((_, rest)) = title.split_once(TITLE_SEPARATOR) else {
        tracing::error!(title, "Wrong href title");
        return None;
    };

    match rest.split_once('(') {
        Some((name, _)) => Some(name.trim().to_string()),
        None => {
            tracing::warn!(title, "Link title has no bracketed suffix, skipping");
            None
        }
    }
}

/// Find all report links in the page markup.
///
/// Relative `href` values are resolved against `base_url`. Links are
/// returned in document order without deduplication.
pub fn extract_links(html: &str, base_url: &str) -> Result<Vec<LinkEntry>> {
    let downloads = parse_selector(DOWNLOADS_SELECTOR)?;
    let report_link = parse_selector(REPORT_LINK_SELECTOR)?;
    let base = Url::parse(base_url).ok();

    let document = Html::parse_document(html);
    let Some(container) = document.select(&downloads).next() else {
        tracing::error!(selector = DOWNLOADS_SELECTOR, "Downloads block not found");
        return Ok(Vec::new());
    };

    let links = container
        .select(&report_link)
        .filter_map(|anchor| link_entry(anchor, base.as_ref()))
        .collect();

    Ok(links)
}

/// Fetch the source page and harvest its report links.
///
/// An unreachable page is logged and yields no links.
pub fn harvest_links(client: &Client, page_url: &str) -> Result<Vec<LinkEntry>> {
    let html = match fetch_text(client, page_url) {
        Ok(html) => html,
        Err(e @ (ExtractorError::Http(_) | ExtractorError::Download { .. })) => {
            tracing::error!(url = page_url, error = %e, "Can't request site");
            return Ok(Vec::new());
        }
        Err(e) => return Err(e),
    };

    extract_links(&html, page_url)
}

fn link_entry(anchor: ElementRef<'_>, base: Option<&Url>) -> Option<LinkEntry> {
    let title: String = anchor.text().collect();
    let facility = clean_title(&title)?;

    let Some(href) = anchor.value().attr("href") else {
        tracing::warn!(facility = %facility, "Report link has no href, skipping");
        return None;
    };

    Some(LinkEntry::new(facility, resolve_href(base, href)))
}

fn resolve_href(base: Option<&Url>, href: &str) -> String {
    let href = href.trim();
    match base.map(|b| b.join(href)) {
        Some(Ok(url)) => url.to_string(),
        Some(Err(e)) => {
            tracing::warn!(href, error = %e, "Can't resolve link, keeping it as is");
            href.to_string()
        }
        None => href.to_string(),
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|_| ExtractorError::Selector(selector.to_string()))
}
