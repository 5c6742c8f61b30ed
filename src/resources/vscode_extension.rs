//! VS Code extensions installed through the `code` CLI.
use std::collections::HashSet;
use std::sync::Arc;

use anyhow::{Result, bail};

use super::{Observed, Resource};
use crate::exec::Executor;

/// CLI names tried in order.
const CODE_COMMANDS: [&str; 2] = ["code", "code-insiders"];

/// One marketplace extension, e.g. `rust-lang.rust-analyzer`.
#[derive(Debug)]
pub struct VsCodeExtensionResource {
    /// Extension id as written in the extension list.
    pub id: String,
    code_cmd: String,
    executor: Arc<dyn Executor>,
}

impl VsCodeExtensionResource {
    /// Extension `id`, installed with the `code_cmd` CLI.
    #[must_use]
    pub fn new(id: String, code_cmd: String, executor: Arc<dyn Executor>) -> Self {
        Self {
            id,
            code_cmd,
            executor,
        }
    }

    /// State from a listing fetched once with [`installed_extensions`].
    /// Ids compare case-insensitively.
    #[must_use]
    pub fn observe_in(&self, installed: &HashSet<String>) -> Observed {
        if installed.contains(&self.id.to_lowercase()) {
            Observed::Matches
        } else {
            Observed::Absent
        }
    }
}

/// Lower-cased ids of every installed extension, from one
/// `--list-extensions` call. A failing listing counts as nothing installed.
///
/// # Errors
///
/// Fails only if the CLI cannot be started.
pub fn installed_extensions(code_cmd: &str, executor: &dyn Executor) -> Result<HashSet<String>> {
    let listing = executor.run_unchecked(code_cmd, &["--list-extensions"])?;
    if !listing.success {
        return Ok(HashSet::new());
    }
    Ok(listing
        .stdout
        .lines()
        .map(|line| line.trim().to_lowercase())
        .filter(|id| !id.is_empty())
        .collect())
}

/// The first VS Code CLI on `PATH`, stable before insiders.
#[must_use]
pub fn find_code_command(executor: &dyn Executor) -> Option<String> {
    CODE_COMMANDS
        .into_iter()
        .find(|cmd| executor.which(cmd))
        .map(String::from)
}

impl Resource for VsCodeExtensionResource {
    fn label(&self) -> String {
        self.id.clone()
    }

    fn observe(&self) -> Result<Observed> {
        let installed = installed_extensions(&self.code_cmd, &*self.executor)?;
        Ok(self.observe_in(&installed))
    }

    fn converge(&self) -> Result<()> {
        let out = self
            .executor
            .run_unchecked(&self.code_cmd, &["--install-extension", &self.id])?;
        if !out.success {
            bail!("{} rejected the extension: {}", self.code_cmd, out.stderr.trim());
        }
        Ok(())
    }
}
