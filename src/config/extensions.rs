//! VS Code extension list loading.
use anyhow::{Context as _, Result};
use std::path::Path;

/// A VS Code extension to install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VsCodeExtension {
    /// Marketplace identifier (e.g. `rust-lang.rust-analyzer`).
    pub id: String,
}

/// Parse a newline-delimited list of extension ids.
///
/// Lines are trimmed; blank lines and `#` comments are ignored.
#[must_use]
pub fn parse_str(content: &str) -> Vec<VsCodeExtension> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|id| VsCodeExtension { id: id.to_string() })
        .collect()
}

/// Load the extension list at `path`.
///
/// Returns `Ok(None)` when the file does not exist.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read.
pub fn load(path: &Path) -> Result<Option<Vec<VsCodeExtension>>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading extension list {}", path.display()))?;
    Ok(Some(parse_str(&content)))
}
