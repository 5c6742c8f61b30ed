//! Homebrew installation and bundle resources.
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};

use super::helpers::download::download_to_temp;
use super::{Observed, Resource};
use crate::exec::Executor;

/// Official Homebrew install script.
pub const HOMEBREW_INSTALL_URL: &str =
    "https://raw.githubusercontent.com/Homebrew/install/HEAD/install.sh";

/// Where the installer puts `brew` on Apple Silicon and Intel machines.
pub const BREW_LOCATIONS: [&str; 2] = ["/opt/homebrew/bin/brew", "/usr/local/bin/brew"];

/// Locate the `brew` executable: `PATH` first, then the given install locations.
///
/// A fresh install is not on `PATH` until the shell profile is reloaded, so
/// the fixed locations matter within the same run.
#[must_use]
pub fn find_brew_in(executor: &dyn Executor, locations: &[&Path]) -> Option<String> {
    if executor.which("brew") {
        return Some("brew".to_string());
    }
    locations
        .iter()
        .find(|p| p.is_file())
        .map(|p| p.to_string_lossy().into_owned())
}

/// Locate `brew` on `PATH` or in the standard install locations.
#[must_use]
pub fn find_brew(executor: &dyn Executor) -> Option<String> {
    let locations = BREW_LOCATIONS.map(Path::new);
    find_brew_in(executor, &locations)
}

/// The Homebrew package manager itself.
#[derive(Debug)]
pub struct HomebrewResource {
    install_url: String,
    executor: Arc<dyn Executor>,
}

impl HomebrewResource {
    /// Create a resource that installs Homebrew from `install_url`.
    #[must_use]
    pub fn new(install_url: impl Into<String>, executor: Arc<dyn Executor>) -> Self {
        Self {
            install_url: install_url.into(),
            executor,
        }
    }
}

impl Resource for HomebrewResource {
    fn label(&self) -> String {
        "Homebrew".to_string()
    }

    fn observe(&self) -> Result<Observed> {
        Ok(match find_brew(&*self.executor) {
            Some(_) => Observed::Matches,
            None => Observed::Absent,
        })
    }

    /// Runs the official script unattended (`NONINTERACTIVE=1`).
    fn converge(&self) -> Result<()> {
        let script = download_to_temp(&self.install_url)?;
        let script = script.path().to_string_lossy();
        self.executor
            .run_with_env("/bin/bash", &[script.as_ref()], &[("NONINTERACTIVE", "1")])
            .context("running Homebrew installer")?;
        Ok(())
    }
}

/// Packages declared in a Brewfile, installed with `brew bundle`.
#[derive(Debug)]
pub struct BrewBundleResource {
    /// Path to the Brewfile.
    pub brewfile: PathBuf,
    brew: String,
    executor: Arc<dyn Executor>,
}

impl BrewBundleResource {
    /// Create a bundle resource using the `brew` executable at `brew`.
    #[must_use]
    pub fn new(brewfile: PathBuf, brew: String, executor: Arc<dyn Executor>) -> Self {
        Self {
            brewfile,
            brew,
            executor,
        }
    }

    fn file_arg(&self) -> String {
        format!("--file={}", self.brewfile.display())
    }
}

impl Resource for BrewBundleResource {
    fn label(&self) -> String {
        format!("brew bundle {}", self.brewfile.display())
    }

    /// `brew bundle check` exits non-zero while anything is missing.
    fn observe(&self) -> Result<Observed> {
        if !self.brewfile.is_file() {
            return Ok(Observed::Unusable(format!(
                "Brewfile not found: {}",
                self.brewfile.display()
            )));
        }
        let check = self.executor.run_unchecked(
            &self.brew,
            &["bundle", "check", "--no-upgrade", &self.file_arg()],
        )?;
        Ok(if check.success {
            Observed::Matches
        } else {
            Observed::Absent
        })
    }

    fn converge(&self) -> Result<()> {
        self.executor
            .run(&self.brew, &["bundle", "install", &self.file_arg()])
            .with_context(|| format!("installing {}", self.brewfile.display()))?;
        Ok(())
    }
}
