//! Install command implementation.
use anyhow::Result;
use std::sync::Arc;

use crate::cli::{GlobalOpts, InstallOpts};
use crate::logging::Logger;
use crate::tasks::{self, Task};

/// Select the tasks named by `--only`, or all tasks minus those named by `--skip`.
///
/// Matching is a case-insensitive substring test on the task name. `--only`
/// takes precedence when both are given.
#[must_use]
pub fn filter_tasks<'a>(tasks: &'a [Box<dyn Task>], opts: &InstallOpts) -> Vec<&'a dyn Task> {
    let matches_any = |name: &str, patterns: &[String]| {
        patterns
            .iter()
            .any(|p| name.contains(&p.to_lowercase()))
    };
    tasks
        .iter()
        .filter(|t| {
            let name = t.name().to_lowercase();
            if !opts.only.is_empty() {
                return matches_any(name.as_str(), opts.only.as_slice());
            }
            !matches_any(name.as_str(), opts.skip.as_slice())
        })
        .map(AsRef::as_ref)
        .collect()
}

/// Run the install command.
///
/// # Errors
///
/// Returns an error if configuration loading fails or any task fails.
pub fn run(global: &GlobalOpts, opts: &InstallOpts, log: &Arc<Logger>) -> Result<()> {
    let runner = super::CommandRunner::new(global, log)?;
    let all = tasks::all_install_tasks();
    runner.run(filter_tasks(&all, opts))
}
