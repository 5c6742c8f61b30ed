use std::path::Path;

use anyhow::Result;

use super::{Context, Policy, Task, TaskResult, converge, retract_all};
use crate::config::link_table::{self, LinkTable, ParsedLinkTable};
use crate::error::MappingError;
use crate::resources::symlink::SymlinkResource;

/// Build one [`SymlinkResource`] per table entry, in table order.
///
/// Sources resolve against `root` and targets against `home`.
#[must_use]
pub fn link_resources(table: &LinkTable, root: &Path, home: &Path) -> Vec<SymlinkResource> {
    table
        .iter()
        .map(|spec| SymlinkResource::new(root.join(&spec.source), home.join(&spec.target)))
        .collect()
}

/// Read the mapping file and report malformed lines.
///
/// Returns `Ok(None)` when the file is absent, after logging a warning.
fn load_table(ctx: &Context) -> Result<Option<LinkTable>> {
    let path = &ctx.config.mapping_file;
    let ParsedLinkTable { table, malformed } = match link_table::load(path) {
        Ok(parsed) => parsed,
        Err(e @ MappingError::MissingFile { .. }) => {
            ctx.log.warn(&e.to_string());
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };

    for diagnostic in &malformed {
        ctx.log.warn(&diagnostic.to_string());
    }
    ctx.log.debug(&format!(
        "{} links in {}",
        table.len(),
        path.display()
    ));
    Ok(Some(table))
}

/// Link every entry of the mapping file into the home directory.
#[derive(Debug)]
pub struct InstallSymlinks;

impl Task for InstallSymlinks {
    fn name(&self) -> &'static str {
        "Install symlinks"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let Some(table) = load_table(ctx)? else {
            return Ok(TaskResult::Skipped("mapping file not found".to_string()));
        };
        converge(
            ctx,
            link_resources(&table, ctx.dotfiles_root(), ctx.home()),
            &Policy::enforce("link").best_effort(),
        )
    }
}

/// Remove links that still point at their mapped source.
#[derive(Debug)]
pub struct UninstallSymlinks;

impl Task for UninstallSymlinks {
    fn name(&self) -> &'static str {
        "Uninstall symlinks"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let Some(table) = load_table(ctx)? else {
            return Ok(TaskResult::Skipped("mapping file not found".to_string()));
        };
        retract_all(
            ctx,
            link_resources(&table, ctx.dotfiles_root(), ctx.home()),
            "unlink",
        )
    }
}
