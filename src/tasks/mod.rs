//! Named, ordered tasks that orchestrate resource changes.
pub mod archive;
pub mod context;
mod converge;
pub mod git_identity;
pub mod packages;
pub mod ssh;
pub mod symlinks;
pub mod vscode_extensions;

pub use context::Context;
pub use converge::{Policy, Tally, TaskResult, converge, converge_observed, retract_all};

use anyhow::Result;

use crate::logging::{TaskRecord, TaskStatus};

/// A named, executable task.
pub trait Task: Send + Sync {
    /// Human-readable task name.
    fn name(&self) -> &str;

    /// Whether this task has anything to do in this run.
    fn should_run(&self, ctx: &Context) -> bool;

    /// Execute the task.
    ///
    /// # Errors
    ///
    /// Returns an error if the task fails to execute, such as when system commands
    /// fail, file operations are not permitted, or a download cannot complete.
    fn run(&self, ctx: &Context) -> Result<TaskResult>;
}

/// The complete set of tasks run by the uninstall command.
#[must_use]
pub fn all_uninstall_tasks() -> Vec<Box<dyn Task>> {
    vec![Box::new(symlinks::UninstallSymlinks)]
}

/// The complete set of tasks run by the install command, in execution order.
///
/// Later tasks read files the earlier ones put in place: the link table,
/// Brewfile and extension list all live in the fetched dotfiles tree, and
/// `brew bundle` needs Homebrew.
#[must_use]
pub fn all_install_tasks() -> Vec<Box<dyn Task>> {
    vec![
        Box::new(archive::FetchDotfiles),
        Box::new(packages::InstallHomebrew),
        Box::new(packages::InstallPackages),
        Box::new(symlinks::InstallSymlinks),
        Box::new(git_identity::ConfigureGitIdentity),
        Box::new(ssh::ConfigureSshKey),
        Box::new(vscode_extensions::InstallVsCodeExtensions),
    ]
}

/// Run `task` unless it does not apply, and record how it ended.
pub fn execute(task: &dyn Task, ctx: &Context) {
    let name = task.name();
    let (status, note) = if task.should_run(ctx) {
        ctx.log.stage(name);
        match task.run(ctx) {
            Ok(TaskResult::Ok) => (TaskStatus::Ok, None),
            Ok(TaskResult::DryRun) => (TaskStatus::DryRun, None),
            Ok(TaskResult::Skipped(reason)) => {
                ctx.log.info(&format!("skipped: {reason}"));
                (TaskStatus::Skipped, Some(reason))
            }
            Err(e) => {
                let note = format!("{e:#}");
                ctx.log.error(&format!("{name}: {note}"));
                (TaskStatus::Failed, Some(note))
            }
        }
    } else {
        ctx.log.debug(&format!("not applicable: {name}"));
        (TaskStatus::NotApplicable, None)
    };
    ctx.log.record(TaskRecord::new(name, status, note.as_deref()));
}


#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Arc;
    use test_helpers::{RecordingLog, empty_config, make_recorded_context};

    /// Task with a canned outcome.
    struct Canned {
        applies: bool,
        outcome: Result<TaskResult, String>,
    }

    impl Task for Canned {
        fn name(&self) -> &str {
            "Canned"
        }
        fn should_run(&self, _: &Context) -> bool {
            self.applies
        }
        fn run(&self, _: &Context) -> Result<TaskResult> {
            self.outcome.clone().map_err(anyhow::Error::msg)
        }
    }

    fn execute_canned(applies: bool, outcome: Result<TaskResult, String>) -> Arc<RecordingLog> {
        let config = empty_config(PathBuf::from("/dots"), PathBuf::from("/home/u"));
        let (ctx, log) = make_recorded_context(config);
        execute(&Canned { applies, outcome }, &ctx);
        log
    }

    #[test]
    fn inapplicable_task_is_recorded_without_running() {
        let log = execute_canned(false, Err("must not run".to_string()));
        assert_eq!(
            log.records(),
            [TaskRecord::new("Canned", TaskStatus::NotApplicable, None)]
        );
        assert!(log.messages("stage").is_empty());
    }

    #[test]
    fn finished_task_gets_a_stage_header() {
        let log = execute_canned(true, Ok(TaskResult::Ok));
        assert_eq!(log.messages("stage"), ["Canned"]);
        assert_eq!(log.records()[0].status, TaskStatus::Ok);
    }

    #[test]
    fn failure_is_logged_and_noted() {
        let log = execute_canned(true, Err("brew exited with status 1".to_string()));
        assert_eq!(log.messages("error"), ["Canned: brew exited with status 1"]);
        assert_eq!(
            log.records(),
            [TaskRecord::new(
                "Canned",
                TaskStatus::Failed,
                Some("brew exited with status 1")
            )]
        );
    }

    #[test]
    fn skip_reason_becomes_the_note() {
        let log = execute_canned(true, Ok(TaskResult::Skipped("no Brewfile".to_string())));
        assert_eq!(log.messages("info"), ["skipped: no Brewfile"]);
        assert_eq!(log.records()[0].note.as_deref(), Some("no Brewfile"));
    }

    #[test]
    fn dry_run_is_its_own_status() {
        let log = execute_canned(true, Ok(TaskResult::DryRun));
        assert_eq!(log.records()[0].status, TaskStatus::DryRun);
    }

    #[test]
    fn install_tasks_run_in_dependency_order() {
        let names: Vec<String> = all_install_tasks()
            .iter()
            .map(|t| t.name().to_string())
            .collect();
        assert_eq!(
            names,
            [
                "Fetch dotfiles",
                "Install Homebrew",
                "Install packages",
                "Install symlinks",
                "Configure git identity",
                "Configure SSH key",
                "Install VS Code extensions",
            ]
        );
    }
}
