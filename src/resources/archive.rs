//! The dotfiles tarball unpacked into the dotfiles root.
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};

use super::helpers::download::download_to_temp;
use super::helpers::fs::is_empty_dir;
use super::{Observed, Resource};
use crate::exec::Executor;

/// A gzipped tarball whose single top-level directory is stripped, so its
/// contents land directly in `dest`.
#[derive(Debug)]
pub struct ArchiveResource {
    /// Archive URL.
    pub url: String,
    /// Dotfiles root the archive is unpacked into.
    pub dest: PathBuf,
    executor: Arc<dyn Executor>,
}

impl ArchiveResource {
    /// Unpack `url` into `dest`.
    #[must_use]
    pub fn new(url: String, dest: PathBuf, executor: Arc<dyn Executor>) -> Self {
        Self {
            url,
            dest,
            executor,
        }
    }

    fn unpack(&self, tarball: &Path) -> Result<()> {
        std::fs::create_dir_all(&self.dest)
            .with_context(|| format!("creating {}", self.dest.display()))?;
        let tarball = tarball.to_string_lossy();
        let dest = self.dest.to_string_lossy();
        self.executor
            .run(
                "tar",
                &[
                    "-xzf",
                    tarball.as_ref(),
                    "-C",
                    dest.as_ref(),
                    "--strip-components",
                    "1",
                ],
            )
            .with_context(|| format!("extracting {}", self.url))?;
        Ok(())
    }
}

impl Resource for ArchiveResource {
    fn label(&self) -> String {
        format!("{} -> {}", self.url, self.dest.display())
    }

    /// A populated root reports `Differs("already present")`; the fetch task
    /// decides whether that means "leave it" or "fetch again".
    fn observe(&self) -> Result<Observed> {
        if !self.dest.exists() || is_empty_dir(&self.dest) {
            return Ok(Observed::Absent);
        }
        if !self.dest.is_dir() {
            return Ok(Observed::Unusable(format!(
                "{} is not a directory",
                self.dest.display()
            )));
        }
        Ok(Observed::Differs("already present".to_string()))
    }

    fn converge(&self) -> Result<()> {
        let tarball = download_to_temp(&self.url)?;
        self.unpack(tarball.path())
    }
}
