use std::sync::Arc;

use anyhow::Result;

use super::{Context, Policy, Task, TaskResult, converge_observed};
use crate::resources::archive::ArchiveResource;
use crate::resources::{Observed, Resource};

/// Download the dotfiles tarball and unpack it into the dotfiles root.
///
/// A root that already has content is only replaced with `refresh` set.
#[derive(Debug)]
pub struct FetchDotfiles;

impl Task for FetchDotfiles {
    fn name(&self) -> &'static str {
        "Fetch dotfiles"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.config.archive_url.is_some()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let Some(url) = ctx.config.archive_url.clone() else {
            return Ok(TaskResult::Skipped("no archive URL configured".to_string()));
        };
        let archive = ArchiveResource::new(
            url,
            ctx.dotfiles_root().to_path_buf(),
            Arc::clone(&ctx.executor),
        );

        let observed = match archive.observe()? {
            Observed::Differs(_) if !ctx.config.refresh => {
                ctx.log.debug(&format!(
                    "{} already populated; set refresh to fetch again",
                    ctx.dotfiles_root().display()
                ));
                Observed::Matches
            }
            observed => observed,
        };

        converge_observed(ctx, [(archive, observed)], &Policy::enforce("fetch"))
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::tasks::test_helpers::{empty_config, make_recorded_context};
    use std::path::Path;

    fn config_with_url(root: &Path) -> Config {
        let mut config = empty_config(root.to_path_buf(), root.join("home"));
        config.archive_url = Some("https://example.com/dotfiles.tar.gz".to_string());
        config
    }

    #[test]
    fn not_applicable_without_url() {
        let dir = tempfile::tempdir().unwrap();
        let (ctx, _log) =
            make_recorded_context(empty_config(dir.path().to_path_buf(), dir.path().join("h")));
        assert!(!FetchDotfiles.should_run(&ctx));
    }

    #[test]
    fn populated_root_is_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("links.txt"), "a->b\n").unwrap();
        let (ctx, log) = make_recorded_context(config_with_url(dir.path()));
        assert!(FetchDotfiles.should_run(&ctx));

        let result = FetchDotfiles.run(&ctx).unwrap();

        assert!(matches!(result, TaskResult::Ok));
        assert_eq!(
            log.messages("info").last().map(String::as_str),
            Some("0 changed, 1 already ok")
        );
        assert!(log.messages("debug")[0].ends_with("set refresh to fetch again"));
    }

    #[test]
    fn dry_run_reports_fetch_for_empty_root() {
        let dir = tempfile::tempdir().unwrap();
        let (mut ctx, log) = make_recorded_context(config_with_url(&dir.path().join("df")));
        ctx.dry_run = true;

        let result = FetchDotfiles.run(&ctx).unwrap();

        assert!(matches!(result, TaskResult::DryRun));
        assert_eq!(log.messages("dry_run").len(), 1);
        assert!(log.messages("dry_run")[0].starts_with("would fetch: https://example.com/"));
        assert!(!dir.path().join("df").exists());
    }

    #[test]
    fn refresh_dry_run_reports_populated_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("links.txt"), "a->b\n").unwrap();
        let mut config = config_with_url(dir.path());
        config.refresh = true;
        let (mut ctx, log) = make_recorded_context(config);
        ctx.dry_run = true;

        FetchDotfiles.run(&ctx).unwrap();

        assert_eq!(log.messages("dry_run").len(), 1);
        assert!(log.messages("dry_run")[0].contains("already present"));
    }
}
