//! Home-directory links into the dotfiles tree.
use anyhow::Result;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use super::helpers::fs::{is_empty_dir, is_real_dir};
use super::{Observed, Resource, Retraction};
use crate::error::LinkError;

/// Appended to `.<target name>` to form the name a new link is created under
/// before it is renamed over the target.
const STAGING_SUFFIX: &str = ".bootstrap-link";

/// `target` as a symlink whose value is `source`, verbatim.
///
/// `source` does not have to exist; a dangling link is a valid result.
#[derive(Debug, Clone)]
pub struct SymlinkResource {
    /// What the link points to.
    pub source: PathBuf,
    /// Where the link lives.
    pub target: PathBuf,
}

impl SymlinkResource {
    /// Link `target` to `source`.
    #[must_use]
    pub const fn new(source: PathBuf, target: PathBuf) -> Self {
        Self { source, target }
    }

    /// Sibling of `target` the new link is created at first.
    ///
    /// # Errors
    ///
    /// Fails when `target` has no file name (`/` or a path ending in `..`).
    pub fn staging_path(&self) -> Result<PathBuf, LinkError> {
        let name = self.target.file_name().ok_or_else(|| LinkError::CreateLink {
            source_path: self.source.clone(),
            target: self.target.clone(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "target has no file name"),
        })?;
        let mut staged = OsString::from(".");
        staged.push(name);
        staged.push(STAGING_SUFFIX);
        Ok(self.target.with_file_name(staged))
    }

    /// Clear the staging name. Only a symlink there can be ours; anything
    /// else is reported and kept.
    fn clear_staging(staged: &Path) -> Result<(), LinkError> {
        match staged.symlink_metadata() {
            Err(_) => Ok(()),
            Ok(meta) if meta.is_symlink() => {
                std::fs::remove_file(staged).map_err(|source| LinkError::RemoveExisting {
                    path: staged.to_path_buf(),
                    source,
                })
            }
            Ok(_) => Err(LinkError::StagingOccupied {
                path: staged.to_path_buf(),
            }),
        }
    }

    fn link(&self) -> Result<(), LinkError> {
        if let Some(parent) = self.target.parent() {
            std::fs::create_dir_all(parent).map_err(|source| LinkError::CreateParent {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let staged = self.staging_path()?;
        Self::clear_staging(&staged)?;

        // rename(2) will not put a symlink over a directory. An empty one is
        // removed first; a non-empty one makes remove_dir fail and stays.
        if is_real_dir(&self.target) {
            std::fs::remove_dir(&self.target).map_err(|source| LinkError::RemoveExisting {
                path: self.target.clone(),
                source,
            })?;
        }

        let link_failed = |source| LinkError::CreateLink {
            source_path: self.source.clone(),
            target: self.target.clone(),
            source,
        };
        create_symlink(&self.source, &staged).map_err(link_failed)?;
        std::fs::rename(&staged, &self.target).map_err(|e| {
            let _ = std::fs::remove_file(&staged);
            link_failed(e)
        })
    }
}

impl Resource for SymlinkResource {
    fn label(&self) -> String {
        format!("{} -> {}", self.target.display(), self.source.display())
    }

    fn observe(&self) -> Result<Observed> {
        let Ok(meta) = self.target.symlink_metadata() else {
            return Ok(Observed::Absent);
        };

        if meta.is_symlink() {
            let value = std::fs::read_link(&self.target)?;
            return Ok(if value == self.source {
                Observed::Matches
            } else {
                Observed::Differs(format!("points to {}", value.display()))
            });
        }

        Ok(Observed::Differs(
            match (meta.is_dir(), is_empty_dir(&self.target)) {
                (true, true) => "an empty directory",
                (true, false) => "a non-empty directory",
                (false, _) => "a regular file",
            }
            .to_string(),
        ))
    }

    fn converge(&self) -> Result<()> {
        Ok(self.link()?)
    }

    /// Removes the target only while it is still a link to `source`.
    fn retract(&self) -> Result<Retraction> {
        match std::fs::read_link(&self.target) {
            Ok(value) if value == self.source => {
                std::fs::remove_file(&self.target).map_err(|source| {
                    LinkError::RemoveExisting {
                        path: self.target.clone(),
                        source,
                    }
                })?;
                Ok(Retraction::Removed)
            }
            Ok(value) => Ok(Retraction::Kept(format!("points to {}", value.display()))),
            Err(_) if self.target.symlink_metadata().is_err() => {
                Ok(Retraction::Kept("already gone".to_string()))
            }
            Err(_) => Ok(Retraction::Kept("not a symlink".to_string())),
        }
    }
}

#[cfg(unix)]
fn create_symlink(source: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(source, link)
}

#[cfg(not(unix))]
fn create_symlink(_source: &Path, _link: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "symlinks are only supported on unix",
    ))
}
