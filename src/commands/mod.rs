pub mod install;
pub mod uninstall;
pub mod version;

use std::sync::Arc;

use anyhow::Result;

use crate::cli::GlobalOpts;
use crate::config::Config;
use crate::exec::SystemExecutor;
use crate::logging::{Log, Logger};
use crate::tasks::{self, Context, Task};

/// Version string reported by `version` and at the start of each run.
#[must_use]
pub fn version_string() -> &'static str {
    option_env!("BOOTSTRAP_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// A loaded configuration and the context every task of one command shares.
#[derive(Debug)]
pub struct CommandRunner {
    ctx: Context,
    log: Arc<Logger>,
}

impl CommandRunner {
    /// Resolve configuration and build the task context.
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined or the config
    /// file cannot be read or parsed.
    pub fn new(global: &GlobalOpts, log: &Arc<Logger>) -> Result<Self> {
        log.info(&format!("bootstrap {}", version_string()));
        let config = Config::load(&global.overrides())?;
        log.debug(&format!("home: {}", config.home.display()));
        log.debug(&format!("dotfiles root: {}", config.root.display()));
        if global.dry_run {
            log.info("dry run: no changes will be made");
        }

        let ctx = Context::new(
            Arc::new(config),
            Arc::clone(log) as Arc<dyn Log>,
            global.dry_run,
            Arc::new(SystemExecutor),
        );
        Ok(Self {
            ctx,
            log: Arc::clone(log),
        })
    }

    /// Run `tasks` against this runner's context.
    ///
    /// # Errors
    ///
    /// Returns an error if one or more tasks recorded a failure.
    pub fn run<'a>(&self, tasks: impl IntoIterator<Item = &'a dyn Task>) -> Result<()> {
        run_tasks_to_completion(tasks, &self.ctx, &self.log)
    }
}

/// Run every task even after failures, then print the summary. The
/// command fails if any task did.
///
/// # Errors
///
/// Returns an error if one or more tasks recorded a failure.
pub fn run_tasks_to_completion<'a>(
    tasks: impl IntoIterator<Item = &'a dyn Task>,
    ctx: &Context,
    log: &Logger,
) -> Result<()> {
    for task in tasks {
        tasks::execute(task, ctx);
    }

    log.print_summary();

    let count = log.failures();
    if count > 0 {
        anyhow::bail!("{count} task(s) failed");
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::config::settings::ConfigFile;
    use crate::tasks::TaskResult;
    use crate::exec::scripted::ScriptedExecutor;
    use std::path::PathBuf;

    struct Fixed(&'static str, bool);

    impl Task for Fixed {
        fn name(&self) -> &str {
            self.0
        }
        fn should_run(&self, _: &Context) -> bool {
            true
        }
        fn run(&self, _: &Context) -> Result<TaskResult> {
            if self.1 {
                Ok(TaskResult::Ok)
            } else {
                anyhow::bail!("broken")
            }
        }
    }

    fn context(log: &Arc<Logger>) -> Context {
        Context::new(
            Arc::new(Config::resolve(
                ConfigFile::default(),
                PathBuf::from("/home/u"),
                None,
            )),
            Arc::clone(log) as Arc<dyn Log>,
            false,
            Arc::new(ScriptedExecutor::default()),
        )
    }

    #[test]
    fn later_tasks_run_after_a_failure() {
        let log = Arc::new(Logger::with_log_file(None));
        let ctx = context(&log);
        let tasks: [&dyn Task; 2] = [&Fixed("first", false), &Fixed("second", true)];

        let err = run_tasks_to_completion(tasks, &ctx, &log).unwrap_err();

        assert_eq!(err.to_string(), "1 task(s) failed");
        let records = log.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].name, "second");
    }

    #[test]
    fn success_when_no_task_failed() {
        let log = Arc::new(Logger::with_log_file(None));
        let ctx = context(&log);
        let tasks: [&dyn Task; 1] = [&Fixed("only", true)];
        assert!(run_tasks_to_completion(tasks, &ctx, &log).is_ok());
    }

    #[test]
    fn version_string_is_not_empty() {
        assert!(!version_string().is_empty());
    }
}
