use std::sync::Arc;

use anyhow::Result;

use super::{Context, Policy, Task, TaskResult, converge_observed};
use crate::config::extensions;
use crate::resources::vscode_extension::{
    VsCodeExtensionResource, find_code_command, installed_extensions,
};

/// Install VS Code extensions listed in the dotfiles tree.
#[derive(Debug)]
pub struct InstallVsCodeExtensions;

impl Task for InstallVsCodeExtensions {
    fn name(&self) -> &'static str {
        "Install VS Code extensions"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let path = &ctx.config.extensions_file;
        let Some(extensions) = extensions::load(path)? else {
            ctx.log
                .debug(&format!("no extension list at {}", path.display()));
            return Ok(TaskResult::Skipped("extension list not found".to_string()));
        };

        let Some(cmd) = find_code_command(&*ctx.executor) else {
            ctx.log.debug("neither code nor code-insiders found in PATH");
            return Ok(TaskResult::Skipped("VS Code CLI not found".to_string()));
        };

        ctx.log.debug(&format!("using VS Code CLI: {cmd}"));
        let installed = installed_extensions(&cmd, &*ctx.executor)?;
        ctx.log.debug(&format!(
            "{} extensions installed, {} listed",
            installed.len(),
            extensions.len()
        ));

        converge_observed(
            ctx,
            extensions.into_iter().map(|ext| {
                let extension =
                    VsCodeExtensionResource::new(ext.id, cmd.clone(), Arc::clone(&ctx.executor));
                let observed = extension.observe_in(&installed);
                (extension, observed)
            }),
            &Policy::fill_gaps("install extension"),
        )
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::exec::Executor;
    use crate::exec::scripted::ScriptedExecutor;
    use crate::tasks::test_helpers::{RecordingLog, empty_config, make_context_with_executor};

    fn context(
        dir: &std::path::Path,
        list: Option<&str>,
        executor: Arc<dyn Executor>,
    ) -> (Context, Arc<RecordingLog>) {
        let config = empty_config(dir.to_path_buf(), dir.join("home"));
        if let Some(list) = list {
            std::fs::create_dir_all(config.extensions_file.parent().unwrap()).unwrap();
            std::fs::write(&config.extensions_file, list).unwrap();
        }
        make_context_with_executor(config, executor)
    }

    #[test]
    fn skipped_without_extension_list() {
        let dir = tempfile::tempdir().unwrap();
        let (ctx, _log) = context(dir.path(), None, Arc::new(ScriptedExecutor::default().on_path(true)));
        let result = InstallVsCodeExtensions.run(&ctx).unwrap();
        assert!(matches!(result, TaskResult::Skipped(ref r) if r == "extension list not found"));
    }

    #[test]
    fn skipped_without_code_cli() {
        let dir = tempfile::tempdir().unwrap();
        let (ctx, _log) = context(
            dir.path(),
            Some("github.copilot\n"),
            Arc::new(ScriptedExecutor::default()),
        );
        let result = InstallVsCodeExtensions.run(&ctx).unwrap();
        assert!(matches!(result, TaskResult::Skipped(ref r) if r == "VS Code CLI not found"));
    }

    #[test]
    fn installs_only_missing_extensions() {
        let dir = tempfile::tempdir().unwrap();
        let executor = Arc::new(
            ScriptedExecutor::replies([(true, "GitHub.Copilot\n"), (true, "")]).on_path(true),
        );
        let (ctx, log) = context(
            dir.path(),
            Some("github.copilot\nrust-lang.rust-analyzer\n"),
            Arc::clone(&executor) as Arc<dyn Executor>,
        );

        let result = InstallVsCodeExtensions.run(&ctx).unwrap();

        assert!(matches!(result, TaskResult::Ok));
        assert_eq!(
            executor.calls(),
            [
                "code --list-extensions",
                "code --install-extension rust-lang.rust-analyzer",
            ]
        );
        assert_eq!(
            log.messages("info").last().map(String::as_str),
            Some("1 changed, 1 already ok")
        );
    }

    #[test]
    fn failed_install_is_a_warning() {
        let dir = tempfile::tempdir().unwrap();
        let executor = Arc::new(
            ScriptedExecutor::replies([(true, ""), (false, "")]).on_path(true),
        );
        let (ctx, log) = context(dir.path(), Some("bad.extension\n"), executor);

        let result = InstallVsCodeExtensions.run(&ctx).unwrap();

        assert!(matches!(result, TaskResult::Ok));
        assert_eq!(log.messages("warn").len(), 1);
        assert!(log.messages("warn")[0].starts_with("failed to install extension bad.extension"));
    }
}
