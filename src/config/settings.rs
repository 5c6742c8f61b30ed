//! On-disk schema of `config.toml`.
//!
//! Every key is optional. Paths are stored as written (possibly with `~`) and
//! resolved into a [`Config`](super::Config) by [`Config::resolve`](super::Config::resolve).
use serde::Deserialize;

/// Root of the config file.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// `[dotfiles]` section.
    pub dotfiles: DotfilesSection,
    /// `[identity]` section.
    pub identity: IdentitySection,
    /// `[ssh]` section.
    pub ssh: SshSection,
}

/// Where the dotfiles live and which files inside them drive the run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DotfilesSection {
    /// Dotfiles root directory.
    pub root: String,
    /// Tarball to download into `root`; nothing is downloaded when unset.
    pub archive_url: Option<String>,
    /// Re-download the archive even when `root` is already populated.
    pub refresh: bool,
    /// Link mapping file, relative to `root`.
    pub mapping_file: String,
    /// Homebrew bundle manifest, relative to `root`.
    pub brewfile: String,
    /// Newline-delimited VS Code extension ids, relative to `root`.
    pub extensions_file: String,
}

impl Default for DotfilesSection {
    fn default() -> Self {
        Self {
            root: "~/.dotfiles".to_string(),
            archive_url: None,
            refresh: false,
            mapping_file: "links.txt".to_string(),
            brewfile: "Brewfile".to_string(),
            extensions_file: "vscode/extensions.txt".to_string(),
        }
    }
}

/// Git author identity written when not already configured.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IdentitySection {
    /// Value for `user.name`.
    pub name: Option<String>,
    /// Value for `user.email`; also used as the SSH key comment.
    pub email: Option<String>,
}

/// SSH key generation settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SshSection {
    /// Private key location.
    pub key_path: String,
    /// Client config file that receives the agent block.
    pub config_path: String,
    /// Regenerate the key pair even if one already exists.
    pub overwrite: bool,
}

impl Default for SshSection {
    fn default() -> Self {
        Self {
            key_path: "~/.ssh/id_ed25519".to_string(),
            config_path: "~/.ssh/config".to_string(),
            overwrite: false,
        }
    }
}
