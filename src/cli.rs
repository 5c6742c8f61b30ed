use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Overrides;

/// `bootstrap [global flags] <command>`.
#[derive(Parser, Debug)]
#[command(
    name = "bootstrap",
    about = "Bootstrap a macOS machine from a dotfiles archive",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Show debug lines on the console
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Flags every command accepts.
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Report what would change and change nothing
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,

    /// Config file (default: $XDG_CONFIG_HOME/bootstrap/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override dotfiles root directory
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Override home directory that links are created in
    #[arg(long, global = true)]
    pub home: Option<PathBuf>,
}

impl GlobalOpts {
    /// The path flags, which beat both the environment and the config file.
    #[must_use]
    pub fn overrides(&self) -> Overrides {
        Overrides {
            config_file: self.config.clone(),
            root: self.root.clone(),
            home: self.home.clone(),
        }
    }
}

/// What to do.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch dotfiles, install packages, link files and configure tools
    Install(InstallOpts),
    /// Remove links created by install
    Uninstall,
    /// Print version information
    Version,
}

impl Command {
    /// Stem of this command's log file.
    #[must_use]
    pub const fn log_name(&self) -> &'static str {
        match self {
            Self::Install(_) => "install",
            Self::Uninstall => "uninstall",
            Self::Version => "version",
        }
    }
}

/// Task selection for `install`.
#[derive(Parser, Debug, Clone, Default)]
pub struct InstallOpts {
    /// Skip tasks whose name contains any of these (case-insensitive)
    #[arg(long, value_delimiter = ',')]
    pub skip: Vec<String>,

    /// Run only tasks whose name contains any of these (case-insensitive)
    #[arg(long, value_delimiter = ',')]
    pub only: Vec<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("bootstrap").chain(args.iter().copied())).unwrap()
    }

    fn install_opts(args: &[&str]) -> InstallOpts {
        match parse(args).command {
            Command::Install(opts) => opts,
            other => panic!("not an install: {other:?}"),
        }
    }

    #[test]
    fn definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_go_before_or_after_the_subcommand() {
        assert!(parse(&["--dry-run", "install"]).global.dry_run);
        assert!(parse(&["install", "-d"]).global.dry_run);
        assert!(parse(&["uninstall", "--verbose"]).verbose);
    }

    #[test]
    fn task_filters_split_on_commas() {
        let opts = install_opts(&["install", "--skip", "packages,ssh", "--only", "symlinks"]);
        assert_eq!(opts.skip, ["packages", "ssh"]);
        assert_eq!(opts.only, ["symlinks"]);
        assert!(install_opts(&["install"]).skip.is_empty());
    }

    #[test]
    fn filters_belong_to_install_only() {
        assert!(Cli::try_parse_from(["bootstrap", "uninstall", "--skip", "x"]).is_err());
    }

    #[test]
    fn path_flags_become_overrides() {
        let overrides = parse(&[
            "--root",
            "/tmp/df",
            "--home",
            "/tmp/home",
            "--config",
            "/tmp/bootstrap.toml",
            "uninstall",
        ])
        .global
        .overrides();
        assert_eq!(overrides.root, Some(PathBuf::from("/tmp/df")));
        assert_eq!(overrides.home, Some(PathBuf::from("/tmp/home")));
        assert_eq!(overrides.config_file, Some(PathBuf::from("/tmp/bootstrap.toml")));
    }

    #[test]
    fn each_command_has_its_own_log_name() {
        assert_eq!(parse(&["install"]).command.log_name(), "install");
        assert_eq!(parse(&["uninstall"]).command.log_name(), "uninstall");
        assert!(matches!(parse(&["version"]).command, Command::Version));
    }
}
