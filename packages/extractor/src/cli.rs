//! Command-line interface for the extractor.

use std::path::{Path, PathBuf};

use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::ExtractorConfig;
use crate::error::Result;
use crate::harvester::extract_all;
use crate::output::write_json;

/// LWG PDF data extractor - water hardness per Wasserwerk as JSON.
#[derive(Parser)]
#[command(name = "lwg-extractor")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output file name
    pub output: PathBuf,
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    extract_command(&ExtractorConfig::default(), &cli.output)
}

/// Execute the extraction and write the results to `output`.
///
/// An empty result is logged and leaves `output` untouched; it is not an
/// error.
pub fn extract_command(config: &ExtractorConfig, output: &Path) -> Result<()> {
    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb.set_message("Extracting water-quality reports...");

    let results = extract_all(config);
    pb.finish_and_clear();
    let results = results?;

    if results.is_empty() {
        tracing::error!("No data found");
        return Ok(());
    }

    write_json(&results, output)?;

    println!(
        "{} {} facilities to {}",
        style("Saved").green().bold(),
        style(results.len()).cyan(),
        output.display()
    );
    tracing::info!(output = %output.display(), "Extracted data written");

    Ok(())
}
