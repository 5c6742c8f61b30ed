// Shared helpers for integration tests.
//
// Provides a temporary dotfiles root and home directory plus a fluent
// builder, so each integration test can set up an isolated machine without
// repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use mac_bootstrap::config::Config;
use mac_bootstrap::config::settings::ConfigFile;
use mac_bootstrap::exec::SystemExecutor;
use mac_bootstrap::logging::{Level, Log, TaskRecord};
use mac_bootstrap::tasks::Context;

/// In-memory [`Log`] that keeps every message for assertions.
#[derive(Debug, Default)]
pub struct RecordingLog {
    lines: Mutex<Vec<(Level, String)>>,
    records: Mutex<Vec<TaskRecord>>,
}

impl RecordingLog {
    /// Messages emitted at `level`, in order.
    pub fn messages(&self, level: Level) -> Vec<String> {
        self.lines
            .lock()
            .expect("log mutex")
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    /// Task records, in order.
    pub fn records(&self) -> Vec<TaskRecord> {
        self.records.lock().expect("log mutex").clone()
    }
}

impl Log for RecordingLog {
    fn emit(&self, level: Level, msg: &str) {
        self.lines
            .lock()
            .expect("log mutex")
            .push((level, msg.to_string()));
    }

    fn record(&self, task: TaskRecord) {
        self.records.lock().expect("log mutex").push(task);
    }
}

/// An isolated machine: a dotfiles root and a home directory, both under one
/// [`tempfile::TempDir`] that is deleted when dropped.
pub struct IntegrationTestContext {
    tmp: tempfile::TempDir,
    /// Dotfiles root (`<tmp>/df`).
    pub root: PathBuf,
    /// Home directory (`<tmp>/home`).
    pub home: PathBuf,
}

impl IntegrationTestContext {
    /// Create empty root and home directories.
    pub fn new() -> Self {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let root = tmp.path().join("df");
        let home = tmp.path().join("home");
        std::fs::create_dir_all(&root).expect("create root");
        std::fs::create_dir_all(&home).expect("create home");
        Self { tmp, root, home }
    }

    /// Resolved configuration with built-in defaults for this root and home.
    pub fn config(&self) -> Config {
        Config::resolve(
            ConfigFile::default(),
            self.home.clone(),
            Some(self.root.clone()),
        )
    }

    /// A task context using the real executor and a fresh [`RecordingLog`].
    pub fn context(&self, dry_run: bool) -> (Context, Arc<RecordingLog>) {
        let log = Arc::new(RecordingLog::default());
        let ctx = Context::new(
            Arc::new(self.config()),
            Arc::clone(&log) as Arc<dyn Log>,
            dry_run,
            Arc::new(SystemExecutor),
        );
        (ctx, log)
    }

    /// Write the link mapping file.
    pub fn write_mapping(&self, content: &str) {
        std::fs::write(self.root.join("links.txt"), content).expect("write mapping file");
    }

    /// Create a file (and its parents) inside the dotfiles root.
    pub fn write_source(&self, relative: &str, content: &str) {
        write_file(&self.root.join(relative), content);
    }

    /// Create a file (and its parents) inside the home directory.
    pub fn write_home(&self, relative: &str, content: &str) {
        write_file(&self.home.join(relative), content);
    }

    /// Every entry under the home directory, relative to it, sorted.
    pub fn home_entries(&self) -> Vec<String> {
        let mut entries = Vec::new();
        collect(&self.home, &self.home, &mut entries);
        entries.sort();
        entries
    }
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent dir");
    }
    std::fs::write(path, content).expect("write file");
}

fn collect(base: &Path, dir: &Path, out: &mut Vec<String>) {
    for entry in std::fs::read_dir(dir).expect("read dir") {
        let path = entry.expect("dir entry").path();
        let relative = path
            .strip_prefix(base)
            .expect("entry under base")
            .to_string_lossy()
            .into_owned();
        out.push(relative);
        if path.symlink_metadata().expect("metadata").is_dir() {
            collect(base, &path, out);
        }
    }
}

/// Fluent builder for [`IntegrationTestContext`].
pub struct TestContextBuilder {
    ctx: IntegrationTestContext,
}

impl TestContextBuilder {
    /// Begin building a new context with empty root and home.
    pub fn new() -> Self {
        Self {
            ctx: IntegrationTestContext::new(),
        }
    }

    /// Write the link mapping file.
    pub fn with_mapping(self, content: &str) -> Self {
        self.ctx.write_mapping(content);
        self
    }

    /// Create a source file inside the dotfiles root.
    pub fn with_source(self, relative: &str) -> Self {
        self.ctx.write_source(relative, relative);
        self
    }

    /// Create a regular file inside the home directory.
    pub fn with_home_file(self, relative: &str, content: &str) -> Self {
        self.ctx.write_home(relative, content);
        self
    }

    /// Finish building and return the configured context.
    pub fn build(self) -> IntegrationTestContext {
        self.ctx
    }
}
