use std::path::Path;
use std::sync::Arc;

use crate::config::Config;
use crate::exec::Executor;
use crate::logging::Log;

/// Everything a task needs: where things live, where output goes, whether
/// to hold back, and how to run commands.
pub struct Context {
    /// Resolved run configuration.
    pub config: Arc<Config>,
    /// Progress lines and the task records behind the summary.
    pub log: Arc<dyn Log>,
    /// Report changes instead of making them.
    pub dry_run: bool,
    /// Runs `brew`, `git`, `ssh-keygen` and friends.
    pub executor: Arc<dyn Executor>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("config", &self.config)
            .field("log", &"<dyn Log>")
            .field("dry_run", &self.dry_run)
            .field("executor", &self.executor)
            .finish()
    }
}

impl Context {
    /// Bundle the pieces a run needs.
    #[must_use]
    pub fn new(
        config: Arc<Config>,
        log: Arc<dyn Log>,
        dry_run: bool,
        executor: Arc<dyn Executor>,
    ) -> Self {
        Self {
            config,
            log,
            dry_run,
            executor,
        }
    }

    /// Home directory that link targets are resolved against.
    #[must_use]
    pub fn home(&self) -> &Path {
        &self.config.home
    }

    /// Root directory of the dotfiles tree.
    #[must_use]
    pub fn dotfiles_root(&self) -> &Path {
        &self.config.root
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::tasks::test_helpers::{empty_config, make_context};
    use std::path::PathBuf;

    #[test]
    fn accessors_return_config_paths() {
        let ctx = make_context(empty_config(PathBuf::from("/dots"), PathBuf::from("/home/u")));
        assert_eq!(ctx.dotfiles_root(), Path::new("/dots"));
        assert_eq!(ctx.home(), Path::new("/home/u"));
    }
}
