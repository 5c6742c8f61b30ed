//! The `tracing`-backed [`Log`] used by the binary.
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::subscriber::{DRY_RUN_TARGET, STAGE_TARGET};
use super::types::{Level, Log, TaskRecord, TaskStatus};
use super::utils::log_file_path;

/// Forwards messages to `tracing` and keeps task records for the summary.
///
/// The log file itself is written by the subscriber from
/// [`init_subscriber`](super::init_subscriber); the logger only remembers
/// its path so the summary can point at it.
#[derive(Debug)]
pub struct Logger {
    records: Mutex<Vec<TaskRecord>>,
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Logger for `command`, pointing at `<cache>/bootstrap/<command>.log`.
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self::with_log_file(log_file_path(command))
    }

    /// Logger whose summary names `log_file`.
    #[must_use]
    pub const fn with_log_file(log_file: Option<PathBuf>) -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            log_file,
        }
    }

    /// Log file named in the summary.
    #[must_use]
    pub fn log_path(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }

    /// Every task record so far, in run order.
    #[must_use]
    pub fn records(&self) -> Vec<TaskRecord> {
        self.records.lock().map_or_else(|_| Vec::new(), |r| r.clone())
    }

    /// Number of tasks recorded as [`TaskStatus::Failed`].
    #[must_use]
    pub fn failures(&self) -> usize {
        self.count(TaskStatus::Failed)
    }

    fn count(&self, status: TaskStatus) -> usize {
        self.records
            .lock()
            .map_or(0, |r| r.iter().filter(|t| t.status == status).count())
    }

    /// One line per task, then the totals and the log file path.
    #[allow(clippy::print_stdout)]
    pub fn print_summary(&self) {
        let records = self.records();
        if records.is_empty() {
            return;
        }

        println!();
        self.stage("Summary");
        for task in &records {
            let (glyph, colour) = task.status.glyph();
            let note = task
                .note
                .as_deref()
                .map_or_else(String::new, |n| format!(" ({n})"));
            self.info(&format!("{colour}{glyph} {}{note}\x1b[0m", task.name));
        }

        let totals = [
            (TaskStatus::Ok, "ok"),
            (TaskStatus::NotApplicable, "n/a"),
            (TaskStatus::Skipped, "skipped"),
            (TaskStatus::DryRun, "dry-run"),
            (TaskStatus::Failed, "failed"),
        ]
        .map(|(status, word)| {
            let (_, colour) = status.glyph();
            format!("{colour}{} {word}\x1b[0m", self.count(status))
        })
        .join(", ");
        self.info(&format!("{} tasks: {totals}", records.len()));

        if let Some(path) = &self.log_file {
            self.info(&format!("\x1b[2mlog: {}\x1b[0m", path.display()));
        }
    }
}

impl Log for Logger {
    fn emit(&self, level: Level, msg: &str) {
        match level {
            Level::Stage => tracing::info!(target: STAGE_TARGET, "{msg}"),
            Level::DryRun => tracing::info!(target: DRY_RUN_TARGET, "{msg}"),
            Level::Info => tracing::info!("{msg}"),
            Level::Debug => tracing::debug!("{msg}"),
            Level::Warn => tracing::warn!("{msg}"),
            Level::Error => tracing::error!("{msg}"),
        }
    }

    fn record(&self, task: TaskRecord) {
        if let Ok(mut records) = self.records.lock() {
            records.push(task);
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::logging::isolated_logger;

    fn file_text(log: &Logger) -> String {
        std::fs::read_to_string(log.log_path().expect("log path")).unwrap()
    }

    #[test]
    fn failures_count_only_failed_tasks() {
        let (log, _tmp, _guard) = isolated_logger();
        assert_eq!(log.failures(), 0);
        log.record(TaskRecord::new("Fetch dotfiles", TaskStatus::NotApplicable, None));
        log.record(TaskRecord::new("Install packages", TaskStatus::Failed, Some("bundle failed")));
        log.record(TaskRecord::new("Configure SSH key", TaskStatus::Failed, Some("no ssh-add")));
        log.record(TaskRecord::new("Install symlinks", TaskStatus::Ok, None));
        assert_eq!(log.failures(), 2);
        assert_eq!(log.records()[1].note.as_deref(), Some("bundle failed"));
    }

    #[test]
    fn every_level_lands_in_the_file_without_colour() {
        let (log, _tmp, _guard) = isolated_logger();
        log.stage("Install symlinks");
        log.debug("using /opt/homebrew/bin/brew");
        log.warn("\x1b[33mfailed to link\x1b[0m ~/.zshrc");
        log.dry_run("would link: ~/.vimrc");

        let text = file_text(&log);
        assert!(text.contains("==> Install symlinks"), "{text}");
        assert!(text.contains("[debug] using /opt/homebrew/bin/brew"), "{text}");
        assert!(text.contains("[warn] failed to link ~/.zshrc"), "{text}");
        assert!(text.contains("[dry run] would link: ~/.vimrc"), "{text}");
    }

    #[test]
    fn summary_lists_each_task_and_totals() {
        let (log, _tmp, _guard) = isolated_logger();
        log.record(TaskRecord::new("Install symlinks", TaskStatus::Ok, None));
        log.record(TaskRecord::new("Install packages", TaskStatus::Failed, Some("bundle failed")));

        log.print_summary();

        let text = file_text(&log);
        assert!(text.contains("✓ Install symlinks"), "{text}");
        assert!(text.contains("✗ Install packages (bundle failed)"), "{text}");
        assert!(
            text.contains("2 tasks: 1 ok, 0 n/a, 0 skipped, 0 dry-run, 1 failed"),
            "{text}"
        );
    }

    #[test]
    fn empty_run_prints_no_summary() {
        let (log, _tmp, _guard) = isolated_logger();
        log.print_summary();
        assert!(!file_text(&log).contains("Summary"));
    }
}
