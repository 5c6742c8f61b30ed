use std::sync::Arc;

use anyhow::Result;

use super::{Context, Policy, Task, TaskResult, converge};
use crate::resources::package::{
    BrewBundleResource, HOMEBREW_INSTALL_URL, HomebrewResource, find_brew,
};

/// Install Homebrew with the official script when `brew` is absent.
#[derive(Debug)]
pub struct InstallHomebrew;

impl Task for InstallHomebrew {
    fn name(&self) -> &'static str {
        "Install Homebrew"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        find_brew(&*ctx.executor).is_none()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        converge(
            ctx,
            [HomebrewResource::new(
                HOMEBREW_INSTALL_URL,
                Arc::clone(&ctx.executor),
            )],
            &Policy::enforce("install"),
        )
    }
}

/// Install everything declared in the Brewfile with `brew bundle`.
#[derive(Debug)]
pub struct InstallPackages;

impl Task for InstallPackages {
    fn name(&self) -> &'static str {
        "Install packages"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        find_brew(&*ctx.executor).is_some()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let brewfile = &ctx.config.brewfile;
        if !brewfile.is_file() {
            ctx.log
                .debug(&format!("no Brewfile at {}", brewfile.display()));
            return Ok(TaskResult::Skipped("Brewfile not found".to_string()));
        }
        let Some(brew) = find_brew(&*ctx.executor) else {
            return Ok(TaskResult::Skipped("brew not found".to_string()));
        };
        ctx.log.debug(&format!("using {brew}"));

        converge(
            ctx,
            [BrewBundleResource::new(
                brewfile.clone(),
                brew,
                Arc::clone(&ctx.executor),
            )],
            &Policy::enforce("install"),
        )
    }
}
