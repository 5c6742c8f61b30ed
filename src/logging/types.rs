//! Message levels, per-task records and the [`Log`] sink tasks write to.

/// What kind of line a message becomes on the console and in the log file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// `==> Task name` header.
    Stage,
    /// Normal progress line.
    Info,
    /// Detail shown with `--verbose` and always kept in the log file.
    Debug,
    /// Something was skipped or failed without stopping the run.
    Warn,
    /// A task failed.
    Error,
    /// What a `--dry-run` would have changed.
    DryRun,
}

/// How a task ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// Ran to completion.
    Ok,
    /// Did not apply to this machine (no archive URL, brew already present).
    NotApplicable,
    /// Started but had nothing to work with (no Brewfile, no `code` CLI).
    Skipped,
    /// Ran with `--dry-run`.
    DryRun,
    /// Returned an error.
    Failed,
}

impl TaskStatus {
    /// Glyph and ANSI colour used in the run summary.
    pub(super) const fn glyph(self) -> (&'static str, &'static str) {
        match self {
            Self::Ok => ("✓", "\x1b[32m"),
            Self::NotApplicable => ("·", "\x1b[2m"),
            Self::Skipped => ("○", "\x1b[33m"),
            Self::DryRun => ("~", "\x1b[37m"),
            Self::Failed => ("✗", "\x1b[31m"),
        }
    }
}

/// One finished task, as listed in the run summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRecord {
    /// Task name, e.g. `Install symlinks`.
    pub name: String,
    /// How it ended.
    pub status: TaskStatus,
    /// Skip reason or error text.
    pub note: Option<String>,
}

impl TaskRecord {
    /// Record for task `name`.
    #[must_use]
    pub fn new(name: &str, status: TaskStatus, note: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            status,
            note: note.map(String::from),
        }
    }
}

/// Where tasks send their output.
///
/// [`Logger`](super::Logger) forwards to `tracing`; tests plug in a recorder.
/// Implementors provide [`emit`](Self::emit) and [`record`](Self::record);
/// the per-level helpers are built on `emit`.
pub trait Log: Send + Sync {
    /// Write one message at `level`.
    fn emit(&self, level: Level, msg: &str);

    /// Keep a task outcome for the summary.
    fn record(&self, task: TaskRecord);

    /// `==> msg` header.
    fn stage(&self, msg: &str) {
        self.emit(Level::Stage, msg);
    }

    /// Progress line.
    fn info(&self, msg: &str) {
        self.emit(Level::Info, msg);
    }

    /// Verbose-only detail.
    fn debug(&self, msg: &str) {
        self.emit(Level::Debug, msg);
    }

    /// Non-fatal problem.
    fn warn(&self, msg: &str) {
        self.emit(Level::Warn, msg);
    }

    /// Task failure.
    fn error(&self, msg: &str) {
        self.emit(Level::Error, msg);
    }

    /// Dry-run intent.
    fn dry_run(&self, msg: &str) {
        self.emit(Level::DryRun, msg);
    }
}
