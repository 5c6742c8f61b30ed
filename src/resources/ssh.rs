//! SSH key pair and client configuration resources.
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};

use super::helpers::fs::{create_parent, remove_if_present};
use super::{Observed, Resource};
use crate::exec::Executor;

/// An ed25519 key pair generated with `ssh-keygen`.
#[derive(Debug)]
pub struct SshKeyResource {
    /// Private key path; the public key is written next to it with `.pub`.
    pub key_path: PathBuf,
    /// Key comment, usually the user's email.
    pub comment: Option<String>,
    /// Replace an existing key pair.
    pub overwrite: bool,
    executor: Arc<dyn Executor>,
}

impl SshKeyResource {
    /// Create a key resource.
    #[must_use]
    pub fn new(
        key_path: PathBuf,
        comment: Option<String>,
        overwrite: bool,
        executor: Arc<dyn Executor>,
    ) -> Self {
        Self {
            key_path,
            comment,
            overwrite,
            executor,
        }
    }

    fn public_key_path(&self) -> PathBuf {
        let mut name = self.key_path.as_os_str().to_os_string();
        name.push(".pub");
        PathBuf::from(name)
    }
}

impl Resource for SshKeyResource {
    fn label(&self) -> String {
        format!("ed25519 key {}", self.key_path.display())
    }

    /// An existing key is kept unless `overwrite` is set.
    fn observe(&self) -> Result<Observed> {
        Ok(match (self.key_path.exists(), self.overwrite) {
            (false, _) => Observed::Absent,
            (true, false) => Observed::Matches,
            (true, true) => Observed::Differs("existing key will be replaced".to_string()),
        })
    }

    fn converge(&self) -> Result<()> {
        create_parent(&self.key_path)?;
        // With an old pair in place ssh-keygen asks before overwriting and
        // would wait forever without a tty.
        remove_if_present(&self.key_path)?;
        remove_if_present(&self.public_key_path())?;

        let key = self.key_path.to_string_lossy();
        let mut args = vec!["-t", "ed25519", "-f", key.as_ref(), "-N", "", "-q"];
        if let Some(comment) = &self.comment {
            args.extend(["-C", comment.as_str()]);
        }
        self.executor
            .run("ssh-keygen", &args)
            .context("generating SSH key")?;
        Ok(())
    }
}

/// Render the client config block that loads `key_path` into the agent and keychain.
#[must_use]
pub fn agent_block(key_path: &Path) -> String {
    format!(
        "Host *\n  AddKeysToAgent yes\n  UseKeychain yes\n  IdentityFile {}\n",
        key_path.display()
    )
}

/// An agent block appended to the SSH client config.
///
/// Existing content is never rewritten; the block is only appended when it
/// is not already present verbatim.
#[derive(Debug, Clone)]
pub struct SshAgentConfigResource {
    /// Client config file (usually `~/.ssh/config`).
    pub config_path: PathBuf,
    /// Key the block refers to.
    pub key_path: PathBuf,
}

impl SshAgentConfigResource {
    /// Create an agent config resource.
    #[must_use]
    pub const fn new(config_path: PathBuf, key_path: PathBuf) -> Self {
        Self {
            config_path,
            key_path,
        }
    }

    /// Current config text, `None` when the file does not exist.
    fn read_config(&self) -> Result<Option<String>> {
        match std::fs::read_to_string(&self.config_path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("reading {}", self.config_path.display())),
        }
    }
}

impl Resource for SshAgentConfigResource {
    fn label(&self) -> String {
        format!("agent block in {}", self.config_path.display())
    }

    fn observe(&self) -> Result<Observed> {
        Ok(match self.read_config()? {
            None => Observed::Absent,
            Some(content) if content.contains(&agent_block(&self.key_path)) => Observed::Matches,
            Some(_) => Observed::Differs("agent block absent".to_string()),
        })
    }

    /// Appends the block, separated from existing content by a blank line.
    fn converge(&self) -> Result<()> {
        create_parent(&self.config_path)?;
        let existing = self.read_config()?.unwrap_or_default();
        let separator = match (existing.is_empty(), existing.ends_with('\n')) {
            (true, _) => "",
            (false, true) => "\n",
            (false, false) => "\n\n",
        };
        let text = format!("{separator}{}", agent_block(&self.key_path));

        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.config_path)
            .with_context(|| format!("opening {}", self.config_path.display()))?;
        file.write_all(text.as_bytes())
            .with_context(|| format!("writing {}", self.config_path.display()))
    }
}

/// Add the private key to the agent, storing its passphrase in the keychain.
///
/// # Errors
///
/// Returns an error if `ssh-add` fails.
pub fn add_to_keychain(executor: &dyn Executor, key_path: &Path) -> Result<()> {
    let key = key_path.to_string_lossy();
    executor
        .run("ssh-add", &["--apple-use-keychain", key.as_ref()])
        .context("adding SSH key to agent")?;
    Ok(())
}

/// Copy the public key to the clipboard with `pbcopy`.
///
/// # Errors
///
/// Returns an error if the public key cannot be read or `pbcopy` fails.
pub fn copy_public_key(executor: &dyn Executor, public_key_path: &Path) -> Result<()> {
    let public_key = std::fs::read_to_string(public_key_path)
        .with_context(|| format!("reading {}", public_key_path.display()))?;
    executor
        .run_with_input("pbcopy", &[], &public_key)
        .context("copying public key to clipboard")?;
    Ok(())
}
