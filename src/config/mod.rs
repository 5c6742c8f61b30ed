pub mod extensions;
pub mod link_table;
pub mod settings;
pub mod toml_loader;

use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use settings::ConfigFile;

/// Environment variable that overrides the dotfiles root.
pub const ROOT_ENV: &str = "BOOTSTRAP_ROOT";

/// Values supplied on the command line, which take precedence over everything else.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    /// Explicit config file (`--config`).
    pub config_file: Option<PathBuf>,
    /// Dotfiles root (`--root`).
    pub root: Option<PathBuf>,
    /// Home directory (`--home`).
    pub home: Option<PathBuf>,
}

/// Git author identity.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Identity {
    /// `user.name`.
    pub name: Option<String>,
    /// `user.email`.
    pub email: Option<String>,
}

/// Resolved SSH key settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshSettings {
    /// Private key path.
    pub key_path: PathBuf,
    /// Client config file.
    pub config_path: PathBuf,
    /// Replace an existing key pair.
    pub overwrite: bool,
}

impl SshSettings {
    /// Path of the public half of the key pair.
    #[must_use]
    pub fn public_key_path(&self) -> PathBuf {
        let mut name = self.key_path.as_os_str().to_os_string();
        name.push(".pub");
        PathBuf::from(name)
    }
}

/// Fully resolved run configuration with every path absolute.
#[derive(Debug, Clone)]
pub struct Config {
    /// Home directory that link targets are resolved against.
    pub home: PathBuf,
    /// Dotfiles root that link sources are resolved against.
    pub root: PathBuf,
    /// Dotfiles tarball to fetch, if any.
    pub archive_url: Option<String>,
    /// Re-fetch the tarball even when the root is populated.
    pub refresh: bool,
    /// Link mapping file.
    pub mapping_file: PathBuf,
    /// Homebrew bundle manifest.
    pub brewfile: PathBuf,
    /// VS Code extension list.
    pub extensions_file: PathBuf,
    /// Git identity.
    pub identity: Identity,
    /// SSH key settings.
    pub ssh: SshSettings,
}

impl Config {
    /// Load and resolve configuration.
    ///
    /// Precedence is command line, then environment (`BOOTSTRAP_ROOT`,
    /// `HOME`), then the config file, then built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HomeNotSet`] if no home directory can be
    /// determined, or an I/O or parse error for an unreadable config file.
    pub fn load(overrides: &Overrides) -> Result<Self, ConfigError> {
        let home = overrides
            .home
            .clone()
            .or_else(|| std::env::var_os("HOME").filter(|h| !h.is_empty()).map(PathBuf::from))
            .ok_or(ConfigError::HomeNotSet)?;

        let config_path = overrides
            .config_file
            .clone()
            .unwrap_or_else(|| default_config_path(&home));
        let file: ConfigFile = toml_loader::load_config(&config_path)?;

        let root = overrides.root.clone().or_else(|| {
            std::env::var_os(ROOT_ENV)
                .filter(|r| !r.is_empty())
                .map(PathBuf::from)
        });

        Ok(Self::resolve(file, home, root))
    }

    /// Build a config from a parsed file, a home directory and an optional root override.
    #[must_use]
    pub fn resolve(file: ConfigFile, home: PathBuf, root_override: Option<PathBuf>) -> Self {
        let root = root_override
            .map_or_else(|| expand(&file.dotfiles.root, &home), |r| expand_path(&r, &home));
        let in_root = |raw: &str| {
            let path = expand(raw, &home);
            if path.is_absolute() {
                path
            } else {
                root.join(path)
            }
        };

        Self {
            mapping_file: in_root(&file.dotfiles.mapping_file),
            brewfile: in_root(&file.dotfiles.brewfile),
            extensions_file: in_root(&file.dotfiles.extensions_file),
            archive_url: file.dotfiles.archive_url.filter(|u| !u.trim().is_empty()),
            refresh: file.dotfiles.refresh,
            identity: Identity {
                name: file.identity.name,
                email: file.identity.email,
            },
            ssh: SshSettings {
                key_path: expand(&file.ssh.key_path, &home),
                config_path: expand(&file.ssh.config_path, &home),
                overwrite: file.ssh.overwrite,
            },
            root,
            home,
        }
    }
}

/// `$XDG_CONFIG_HOME/bootstrap/config.toml`, falling back to `~/.config`.
#[must_use]
pub fn default_config_path(home: &Path) -> PathBuf {
    std::env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map_or_else(|| home.join(".config"), PathBuf::from)
        .join("bootstrap")
        .join("config.toml")
}

/// Expand a leading `~` against `home`.
fn expand(raw: &str, home: &Path) -> PathBuf {
    let expanded = shellexpand::tilde_with_context(raw, || Some(home.to_string_lossy()));
    PathBuf::from(expanded.as_ref())
}

fn expand_path(path: &Path, home: &Path) -> PathBuf {
    path.to_str().map_or_else(|| path.to_path_buf(), |s| expand(s, home))
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    fn home() -> PathBuf {
        PathBuf::from("/Users/dev")
    }

    #[test]
    fn defaults_resolve_under_home() {
        let config = Config::resolve(ConfigFile::default(), home(), None);
        assert_eq!(config.root, PathBuf::from("/Users/dev/.dotfiles"));
        assert_eq!(
            config.mapping_file,
            PathBuf::from("/Users/dev/.dotfiles/links.txt")
        );
        assert_eq!(config.brewfile, PathBuf::from("/Users/dev/.dotfiles/Brewfile"));
        assert_eq!(
            config.extensions_file,
            PathBuf::from("/Users/dev/.dotfiles/vscode/extensions.txt")
        );
        assert_eq!(config.ssh.key_path, PathBuf::from("/Users/dev/.ssh/id_ed25519"));
        assert!(config.archive_url.is_none());
    }

    #[test]
    fn root_override_wins_over_file() {
        let mut file = ConfigFile::default();
        file.dotfiles.root = "~/from-file".to_string();
        let config = Config::resolve(file, home(), Some(PathBuf::from("/opt/df")));
        assert_eq!(config.root, PathBuf::from("/opt/df"));
        assert_eq!(config.mapping_file, PathBuf::from("/opt/df/links.txt"));
    }

    #[test]
    fn root_override_expands_tilde() {
        let config = Config::resolve(ConfigFile::default(), home(), Some(PathBuf::from("~/df")));
        assert_eq!(config.root, PathBuf::from("/Users/dev/df"));
    }

    #[test]
    fn absolute_manifest_path_is_not_joined() {
        let mut file = ConfigFile::default();
        file.dotfiles.mapping_file = "/etc/links.txt".to_string();
        let config = Config::resolve(file, home(), None);
        assert_eq!(config.mapping_file, PathBuf::from("/etc/links.txt"));
    }

    #[test]
    fn blank_archive_url_is_treated_as_unset() {
        let mut file = ConfigFile::default();
        file.dotfiles.archive_url = Some("  ".to_string());
        let config = Config::resolve(file, home(), None);
        assert!(config.archive_url.is_none());
    }

    #[test]
    fn public_key_path_appends_pub() {
        let config = Config::resolve(ConfigFile::default(), home(), None);
        assert_eq!(
            config.ssh.public_key_path(),
            PathBuf::from("/Users/dev/.ssh/id_ed25519.pub")
        );
    }

    #[test]
    fn load_with_explicit_home_and_config() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        std::fs::write(
            &config_path,
            "[identity]\nname = \"Dev\"\n[ssh]\noverwrite = true\n",
        )
        .unwrap();
        let overrides = Overrides {
            config_file: Some(config_path),
            root: Some(dir.path().join("df")),
            home: Some(dir.path().to_path_buf()),
        };
        let config = Config::load(&overrides).unwrap();
        assert_eq!(config.home, dir.path());
        assert_eq!(config.root, dir.path().join("df"));
        assert_eq!(config.identity.name.as_deref(), Some("Dev"));
        assert!(config.ssh.overwrite);
    }

    #[test]
    fn load_reports_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        std::fs::write(&config_path, "[dotfiles]\nunknown = 1\n").unwrap();
        let overrides = Overrides {
            config_file: Some(config_path),
            root: None,
            home: Some(dir.path().to_path_buf()),
        };
        assert!(matches!(
            Config::load(&overrides),
            Err(ConfigError::Parse { .. })
        ));
    }
}
