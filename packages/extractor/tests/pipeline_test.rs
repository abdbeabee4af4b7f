//! End-to-end runs against a mock LWG website.
//!
//! The extractor uses a blocking HTTP client, so every run is moved onto a
//! blocking thread while the mock server lives on the async runtime.

mod common;

use std::fs;
use std::time::Duration;

use pretty_assertions::assert_eq;
use tempfile::tempdir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use lwg_extractor::cli::extract_command;
use lwg_extractor::config::TEMP_FILE_NAME;
use lwg_extractor::http::create_client;
use lwg_extractor::links::harvest_links;
use lwg_extractor::pdf::PdfTableSource;
use lwg_extractor::pipeline::fetch_all;
use lwg_extractor::types::{LinkEntry, Measurement};
use lwg_extractor::{extract_all, ExtractorConfig};

const PAGE_PATH: &str = "/de/kundenportal/trinkwasser/wasserqualitaet-wasserhaerte.html";

const PAGE: &str = r#"<!DOCTYPE html>
<html><body>
  <div class="boxWrap downloads">
    <a class="hasImg" href="/fileadmin/tettau.pdf"><img src="/pdf.png"> Wasserwerk – Tettau (PDF, 120 KB)</a>
    <a class="hasImg" href="/fileadmin/briesen.pdf">Wasserwerk – Briesen (PDF, 98 KB)</a>
    <a class="hasImg" href="/fileadmin/preise.pdf">Preisblatt Trinkwasser (PDF)</a>
    <a class="hasImg" href="/fileadmin/brief.pdf">Wasserwerk – Schwarzheide (PDF)</a>
  </div>
</body></html>"#;

async fn mount_site(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(PAGE_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html; charset=utf-8")
                .set_body_string(PAGE),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/fileadmin/tettau.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(common::report_pdf([
            "1,23", "2", "7,5", "13", "2,1", "31", "< 1", "85",
        ])))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/fileadmin/briesen.pdf"))
        .respond_with(ResponseTemplate::new(404))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/fileadmin/brief.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(common::prose_pdf()))
        .mount(server)
        .await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_harvest_links_from_page() {
    let server = MockServer::start().await;
    mount_site(&server).await;
    let page_url = format!("{}{PAGE_PATH}", server.uri());
    let base = server.uri();

    let links = tokio::task::spawn_blocking(move || {
        let client = create_client(&ExtractorConfig::default()).unwrap();
        harvest_links(&client, &page_url).unwrap()
    })
    .await
    .unwrap();

    assert_eq!(
        links,
        vec![
            LinkEntry::new("Tettau", format!("{base}/fileadmin/tettau.pdf")),
            LinkEntry::new("Briesen", format!("{base}/fileadmin/briesen.pdf")),
            LinkEntry::new("Schwarzheide", format!("{base}/fileadmin/brief.pdf")),
        ]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unreachable_page_yields_no_links() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let page_url = format!("{}{PAGE_PATH}", server.uri());

    let links = tokio::task::spawn_blocking(move || {
        let client = create_client(&ExtractorConfig::default()).unwrap();
        harvest_links(&client, &page_url).unwrap()
    })
    .await
    .unwrap();

    assert!(links.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_slow_page_hits_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PAGE_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(PAGE)
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;
    let config = ExtractorConfig::default()
        .with_source_url(format!("{}{PAGE_PATH}", server.uri()))
        .with_http_timeout(Duration::from_millis(200));

    let results = tokio::task::spawn_blocking(move || extract_all(&config).unwrap())
        .await
        .unwrap();

    assert!(results.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_extract_all() {
    let server = MockServer::start().await;
    mount_site(&server).await;
    let dir = tempdir().unwrap();
    let config = ExtractorConfig::default()
        .with_source_url(format!("{}{PAGE_PATH}", server.uri()))
        .with_temp_dir(dir.path());
    let temp_file = config.temp_file().unwrap();

    let results = tokio::task::spawn_blocking(move || extract_all(&config).unwrap())
        .await
        .unwrap();

    // Briesen failed to download, the price sheet has no facility title
    let facilities: Vec<&str> = results.keys().map(String::as_str).collect();
    assert_eq!(facilities, vec!["Schwarzheide", "Tettau"]);

    let tettau = results["Tettau"].metrics().expect("complete record");
    assert_eq!(tettau.hardness, Some(Measurement::Float(1.23)));
    assert_eq!(tettau.calcium, Some(Measurement::Integer(2)));
    assert_eq!(tettau.nitrate, None);

    assert!(results["Schwarzheide"].is_empty());
    assert!(!temp_file.exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_extract_all_keeps_buffer_in_run_directory() {
    let server = MockServer::start().await;
    mount_site(&server).await;
    let config = ExtractorConfig::default().with_source_url(format!("{}{PAGE_PATH}", server.uri()));
    assert_eq!(config.temp_dir, None);

    // a buffer with the same name directly in the system temp directory
    let shared_buffer = std::env::temp_dir().join(TEMP_FILE_NAME);
    fs::write(&shared_buffer, "other run").unwrap();

    let results = tokio::task::spawn_blocking(move || extract_all(&config).unwrap())
        .await
        .unwrap();

    let untouched = fs::read_to_string(&shared_buffer).ok();
    let _ = fs::remove_file(&shared_buffer);

    assert_eq!(results.len(), 2);
    assert!(results["Tettau"].metrics().is_some());
    assert_eq!(untouched.as_deref(), Some("other run"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_fetch_all_reuses_temp_file() {
    let server = MockServer::start().await;
    mount_site(&server).await;
    let dir = tempdir().unwrap();
    let temp_file = dir.path().join("report.pdf");
    let tettau = format!("{}/fileadmin/tettau.pdf", server.uri());
    let links = vec![
        LinkEntry::new("Tettau", tettau.clone()),
        LinkEntry::new("Tettau Ost", tettau),
    ];

    let (results, leftover) = tokio::task::spawn_blocking(move || {
        let client = create_client(&ExtractorConfig::default()).unwrap();
        let results = fetch_all(&client, &links, &PdfTableSource, &temp_file);
        (results, temp_file.exists())
    })
    .await
    .unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results["Tettau"], results["Tettau Ost"]);
    assert!(!leftover);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_extract_command_writes_json() {
    let server = MockServer::start().await;
    mount_site(&server).await;
    let dir = tempdir().unwrap();
    let output = dir.path().join("lwg.json");
    let config = ExtractorConfig::default()
        .with_source_url(format!("{}{PAGE_PATH}", server.uri()))
        .with_temp_dir(dir.path());

    let written = output.clone();
    tokio::task::spawn_blocking(move || extract_command(&config, &written).unwrap())
        .await
        .unwrap();

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(json["Tettau"]["haerte"], serde_json::json!(1.23));
    assert_eq!(json["Tettau"]["calcium"], serde_json::json!(2));
    assert!(json["Tettau"]["nitrat"].is_null());
    assert_eq!(json["Tettau"].as_object().unwrap().len(), 8);
    assert_eq!(json["Schwarzheide"], serde_json::json!({}));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_extract_command_without_results_writes_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let dir = tempdir().unwrap();
    let output = dir.path().join("lwg.json");
    let config = ExtractorConfig::default()
        .with_source_url(format!("{}{PAGE_PATH}", server.uri()))
        .with_temp_dir(dir.path());

    let written = output.clone();
    let outcome = tokio::task::spawn_blocking(move || extract_command(&config, &written))
        .await
        .unwrap();

    assert!(outcome.is_ok());
    assert!(!output.exists());
}
