//! Small file-system predicates and fix-ups used by several resources.
use anyhow::{Context as _, Result};
use std::path::Path;

/// `mkdir -p` for the directory holding `path`.
///
/// # Errors
///
/// Fails when a component exists but is not a directory, or on permissions.
pub fn create_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => std::fs::create_dir_all(dir)
            .with_context(|| format!("creating directory {}", dir.display())),
        _ => Ok(()),
    }
}

/// Unlink the file or symlink at `path`; a missing path is fine.
///
/// Dangling symlinks count as present and are removed.
///
/// # Errors
///
/// Fails when something is there but cannot be removed.
pub fn remove_if_present(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        other => other.with_context(|| format!("removing {}", path.display())),
    }
}

/// A directory that is not reached through a symlink.
#[must_use]
pub fn is_real_dir(path: &Path) -> bool {
    path.symlink_metadata().is_ok_and(|m| m.is_dir())
}

/// A readable directory without entries.
#[must_use]
pub fn is_empty_dir(path: &Path) -> bool {
    std::fs::read_dir(path).is_ok_and(|mut entries| entries.next().is_none())
}
