//! Things on the machine that bootstrap brings into shape: home-directory
//! links, git keys, the SSH key pair, Homebrew, the Brewfile bundle and VS
//! Code extensions.
//!
//! Each one can look at the machine ([`Resource::observe`]) and change it
//! ([`Resource::converge`]). Deciding *whether* to change it is left to
//! [`crate::tasks::converge`].
pub mod archive;
pub mod git_config;
pub mod helpers;
pub mod package;
pub mod ssh;
pub mod symlink;
pub mod vscode_extension;

use anyhow::{Result, bail};

/// How a resource on the machine compares to what bootstrap wants.
///
/// # Examples
///
/// ```
/// use mac_bootstrap::resources::Observed;
///
/// let link = Observed::Differs("points to /old/zshrc".into());
/// assert!(link.needs_work());
/// assert!(!Observed::Matches.needs_work());
/// assert!(!Observed::Unusable("Brewfile not found".into()).needs_work());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observed {
    /// Nothing is there yet.
    Absent,
    /// Already exactly as wanted.
    Matches,
    /// Something else occupies the spot; the text describes it.
    Differs(String),
    /// Cannot be brought into shape in this run; the text says why.
    Unusable(String),
}

impl Observed {
    /// Whether converging would change anything.
    #[must_use]
    pub const fn needs_work(&self) -> bool {
        matches!(self, Self::Absent | Self::Differs(_))
    }
}

/// Outcome of [`Resource::retract`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Retraction {
    /// The resource was removed.
    Removed,
    /// Left in place because it is not ours; the text says what is there.
    Kept(String),
}

/// One thing on the machine that can be inspected and brought into shape.
pub trait Resource {
    /// Short description used in log lines, e.g. `~/.zshrc -> ~/dotfiles/zshrc`.
    fn label(&self) -> String;

    /// Look at the machine without changing it.
    ///
    /// # Errors
    ///
    /// Fails when the machine cannot be inspected (unreadable file, a query
    /// command that cannot start).
    fn observe(&self) -> Result<Observed>;

    /// Make the machine match. Called only when [`observe`](Self::observe)
    /// reported [`Observed::Absent`] or [`Observed::Differs`].
    ///
    /// # Errors
    ///
    /// Fails with the underlying I/O or command error.
    fn converge(&self) -> Result<()>;

    /// Undo [`converge`](Self::converge) where that is safe.
    ///
    /// # Errors
    ///
    /// Fails when removal goes wrong, and by default for resources that
    /// cannot be removed at all.
    fn retract(&self) -> Result<Retraction> {
        bail!("{} cannot be removed", self.label())
    }
}
