//! One `git config --global` key.
use std::sync::Arc;

use anyhow::{Context as _, Result};

use super::{Observed, Resource};
use crate::exec::Executor;

/// A global git key such as `user.email` and the value bootstrap wants in it.
#[derive(Debug)]
pub struct GitConfigResource {
    /// Dotted key name.
    pub key: String,
    /// Value to set.
    pub value: String,
    executor: Arc<dyn Executor>,
}

impl GitConfigResource {
    /// Global `key` set to `value`.
    #[must_use]
    pub fn new(key: String, value: String, executor: Arc<dyn Executor>) -> Self {
        Self {
            key,
            value,
            executor,
        }
    }
}

impl Resource for GitConfigResource {
    fn label(&self) -> String {
        format!("{} = {}", self.key, self.value)
    }

    /// `git config --get` exits 1 for an unset key, so failure means absent.
    fn observe(&self) -> Result<Observed> {
        let got = self
            .executor
            .run_unchecked("git", &["config", "--global", "--get", &self.key])?;
        let current = got.stdout.trim();
        Ok(match (got.success, current) {
            (false, _) | (true, "") => Observed::Absent,
            (true, v) if v == self.value => Observed::Matches,
            (true, v) => Observed::Differs(v.to_string()),
        })
    }

    fn converge(&self) -> Result<()> {
        self.executor
            .run("git", &["config", "--global", &self.key, &self.value])
            .with_context(|| format!("setting {}", self.key))?;
        Ok(())
    }
}
