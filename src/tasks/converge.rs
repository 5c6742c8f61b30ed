//! The loop every task runs over its resources: observe, decide, converge,
//! count.
//!
//! Resources are handled one at a time in the order given, and each is
//! observed just before it is acted on, so when two entries share a path
//! the later one decides what is left on disk.

use anyhow::Result;

use super::Context;
use crate::resources::{Observed, Resource, Retraction};

/// How a task ended, before it is turned into a summary record.
///
/// # Examples
///
/// ```
/// use mac_bootstrap::tasks::TaskResult;
///
/// let skipped = TaskResult::Skipped("Brewfile not found".into());
/// assert!(matches!(skipped, TaskResult::Skipped(_)));
/// ```
#[derive(Debug, Clone)]
pub enum TaskResult {
    /// Everything was brought into shape.
    Ok,
    /// Nothing to work with; the text says what was missing.
    Skipped(String),
    /// Ran with `--dry-run`.
    DryRun,
}

/// What a task does with each observation.
///
/// # Examples
///
/// ```
/// use mac_bootstrap::tasks::Policy;
///
/// let links = Policy::enforce("link").best_effort();
/// assert!(links.replace_mismatched && !links.fail_fast);
///
/// let identity = Policy::fill_gaps("set");
/// assert!(!identity.replace_mismatched);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Policy<'a> {
    /// Verb used in log lines: `link`, `set`, `install extension`.
    pub action: &'a str,
    /// Replace things that are present but differ. Otherwise leave them.
    pub replace_mismatched: bool,
    /// Stop at the first failure. Otherwise warn and carry on.
    pub fail_fast: bool,
}

impl<'a> Policy<'a> {
    /// Make every resource match, stopping at the first failure.
    #[must_use]
    pub const fn enforce(action: &'a str) -> Self {
        Self {
            action,
            replace_mismatched: true,
            fail_fast: true,
        }
    }

    /// Only create what is absent; anything already there is left alone and
    /// failures are warnings.
    #[must_use]
    pub const fn fill_gaps(action: &'a str) -> Self {
        Self {
            action,
            replace_mismatched: false,
            fail_fast: false,
        }
    }

    /// Warn about failures and keep going.
    #[must_use]
    pub const fn best_effort(mut self) -> Self {
        self.fail_fast = false;
        self
    }
}

/// Per-task counts, logged as the task's last line.
///
/// # Examples
///
/// ```
/// use mac_bootstrap::tasks::Tally;
///
/// let tally = Tally { changed: 2, unchanged: 5, skipped: 1 };
/// assert_eq!(tally.line(false), "2 changed, 5 already ok, 1 skipped");
/// assert_eq!(Tally { skipped: 0, ..tally }.line(true), "2 would change, 5 already ok");
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    /// Created, replaced or removed (or would be, in a dry run).
    pub changed: u32,
    /// Already as wanted.
    pub unchanged: u32,
    /// Left alone: unusable, kept as is, or failed.
    pub skipped: u32,
}

impl Tally {
    /// `N changed, M already ok`, plus `K skipped` when there were any.
    #[must_use]
    pub fn line(&self, dry_run: bool) -> String {
        let verb = if dry_run { "would change" } else { "changed" };
        let mut line = format!("{} {verb}, {} already ok", self.changed, self.unchanged);
        if self.skipped > 0 {
            line.push_str(&format!(", {} skipped", self.skipped));
        }
        line
    }

    /// Log [`line`](Self::line) and end the task.
    #[must_use]
    pub fn conclude(self, ctx: &Context) -> TaskResult {
        ctx.log.info(&self.line(ctx.dry_run));
        if ctx.dry_run {
            TaskResult::DryRun
        } else {
            TaskResult::Ok
        }
    }

    const fn count(&mut self, step: Step) {
        match step {
            Step::Changed => self.changed += 1,
            Step::Unchanged => self.unchanged += 1,
            Step::Skipped => self.skipped += 1,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Changed,
    Unchanged,
    Skipped,
}

/// Observe and converge each resource in turn.
///
/// # Errors
///
/// With [`Policy::fail_fast`], the first resource that cannot be observed or
/// converged ends the task with its error.
pub fn converge<R: Resource>(
    ctx: &Context,
    resources: impl IntoIterator<Item = R>,
    policy: &Policy,
) -> Result<TaskResult> {
    let mut tally = Tally::default();
    for resource in resources {
        let observed = match resource.observe() {
            Ok(observed) => observed,
            Err(e) if policy.fail_fast => return Err(e),
            Err(e) => {
                ctx.log
                    .warn(&format!("failed to check {}: {e:#}", resource.label()));
                tally.count(Step::Skipped);
                continue;
            }
        };
        tally.count(step(ctx, &resource, observed, policy)?);
    }
    Ok(tally.conclude(ctx))
}

/// Like [`converge`], for tasks that observed everything up front with a
/// single query.
///
/// # Errors
///
/// With [`Policy::fail_fast`], the first failed convergence.
pub fn converge_observed<R: Resource>(
    ctx: &Context,
    observed: impl IntoIterator<Item = (R, Observed)>,
    policy: &Policy,
) -> Result<TaskResult> {
    let mut tally = Tally::default();
    for (resource, seen) in observed {
        tally.count(step(ctx, &resource, seen, policy)?);
    }
    Ok(tally.conclude(ctx))
}

/// Retract each resource, leaving alone whatever is not ours.
///
/// # Errors
///
/// The first resource that cannot be observed or removed.
pub fn retract_all<R: Resource>(
    ctx: &Context,
    resources: impl IntoIterator<Item = R>,
    action: &str,
) -> Result<TaskResult> {
    let mut tally = Tally::default();
    for resource in resources {
        let label = resource.label();
        if ctx.dry_run {
            if resource.observe()? == Observed::Matches {
                ctx.log.dry_run(&format!("would {action}: {label}"));
                tally.count(Step::Changed);
            } else {
                tally.count(Step::Unchanged);
            }
            continue;
        }
        match resource.retract()? {
            Retraction::Removed => {
                ctx.log.info(&format!("{action}: {label}"));
                tally.count(Step::Changed);
            }
            Retraction::Kept(what) => {
                ctx.log.debug(&format!("leaving {label} ({what})"));
                tally.count(Step::Unchanged);
            }
        }
    }
    Ok(tally.conclude(ctx))
}

fn step<R: Resource>(
    ctx: &Context,
    resource: &R,
    observed: Observed,
    policy: &Policy,
) -> Result<Step> {
    let label = resource.label();
    let action = policy.action;
    let current = match observed {
        Observed::Matches => {
            ctx.log.debug(&format!("ok: {label}"));
            return Ok(Step::Unchanged);
        }
        Observed::Unusable(why) => {
            ctx.log.warn(&format!("skipping {label}: {why}"));
            return Ok(Step::Skipped);
        }
        Observed::Differs(current) if !policy.replace_mismatched => {
            ctx.log.debug(&format!("leaving {label} as is ({current})"));
            return Ok(Step::Skipped);
        }
        Observed::Differs(current) => Some(current),
        Observed::Absent => None,
    };

    if ctx.dry_run {
        ctx.log.dry_run(&match &current {
            Some(current) => format!("would {action} {label} (currently {current})"),
            None => format!("would {action}: {label}"),
        });
        return Ok(Step::Changed);
    }

    if let Some(current) = &current {
        ctx.log.debug(&format!("replacing {label} ({current})"));
    }
    match resource.converge() {
        Ok(()) => {
            ctx.log.info(&format!("{action}: {label}"));
            Ok(Step::Changed)
        }
        Err(e) if policy.fail_fast => Err(e),
        Err(e) => {
            ctx.log.warn(&format!("failed to {action} {label}: {e:#}"));
            Ok(Step::Skipped)
        }
    }
}
