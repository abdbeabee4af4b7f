//! JSON output of the extraction results.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::types::ResultSet;

/// Serialize the results to a pretty-printed JSON string.
pub fn to_json(results: &ResultSet) -> Result<String> {
    Ok(serde_json::to_string_pretty(results)?)
}

/// Write the results as JSON to `path`.
///
/// The content goes to a hidden sibling file first, which is then renamed
/// over `path`, so an interrupted run never leaves a truncated file.
pub fn write_json(results: &ResultSet, path: &Path) -> Result<()> {
    let content = to_json(results)?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output.json".to_string());
    let temp_file = path.with_file_name(format!(".{file_name}.tmp"));

    {
        let mut file = File::create(&temp_file)?;
        file.write_all(content.as_bytes())?;
        file.write_all(b"\n")?;
        file.sync_all()?;
    }

    // On Windows, rename fails if the destination already exists
    #[cfg(target_os = "windows")]
    if path.exists() {
        fs::remove_file(path)?;
    }

    fs::rename(&temp_file, path)?;
    Ok(())
}
