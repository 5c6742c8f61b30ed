use std::sync::Arc;

use anyhow::Result;

use super::{Context, Policy, Task, TaskResult, converge};
use crate::resources::git_config::GitConfigResource;

/// Set the global git author identity where it is not already set.
#[derive(Debug)]
pub struct ConfigureGitIdentity;

impl Task for ConfigureGitIdentity {
    fn name(&self) -> &'static str {
        "Configure git identity"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.executor.which("git")
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let identity = &ctx.config.identity;
        let mut resources = Vec::new();
        for (key, value) in [
            ("user.name", &identity.name),
            ("user.email", &identity.email),
        ] {
            match value {
                Some(value) => resources.push(GitConfigResource::new(
                    key.to_string(),
                    value.clone(),
                    Arc::clone(&ctx.executor),
                )),
                None => ctx.log.debug(&format!("{key} not configured")),
            }
        }

        if resources.is_empty() {
            return Ok(TaskResult::Skipped("no identity configured".to_string()));
        }

        // An existing value was chosen by the user and wins over ours.
        converge(ctx, resources, &Policy::fill_gaps("set"))
    }
}
