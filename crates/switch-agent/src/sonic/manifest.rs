//! The local `key: value` version manifest.

use std::collections::HashMap;
use std::path::Path;

/// Parse manifest text into a key/value map.
///
/// Blank lines, `#` comments and `---` separators are skipped. Each remaining
/// line is split on its first `:`, both sides are trimmed and surrounding
/// quotes are stripped from the value.
#[must_use]
pub fn parse_manifest(content: &str) -> HashMap<String, String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with("---"))
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| {
            let value = value.trim().trim_matches(|c| c == '\'' || c == '"');
            (key.trim().to_string(), value.to_string())
        })
        .collect()
}

/// Read and parse the manifest at `path`.
///
/// # Errors
///
/// Returns the I/O error if the file cannot be read.
pub async fn read_manifest(path: &Path) -> std::io::Result<HashMap<String, String>> {
    let content = tokio::fs::read_to_string(path).await?;
    Ok(parse_manifest(&content))
}
