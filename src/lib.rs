//! macOS bootstrap engine.
//!
//! Brings a fresh Mac to a working state: fetches a dotfiles tarball,
//! installs Homebrew and the Brewfile bundle, links dotfiles into the home
//! directory, sets the git identity, creates an SSH key and installs VS Code
//! extensions. Every step is idempotent and safe to re-run.
//!
//! The public API is organised into four layers:
//!
//! - **[`config`]** - resolve the TOML config and parse the link mapping file
//! - **[`resources`]** - things on the machine that can be observed and converged
//! - **[`tasks`]** - named, ordered units of work wired to resources
//! - **[`commands`]** - top-level subcommand orchestration (`install`, `uninstall`)
//!
//! # Examples
//!
//! ```
//! use mac_bootstrap::config::link_table;
//!
//! let parsed = link_table::parse_str("configs/.zshrc->.zshrc\nconfigs/.vimrc->.vim/.vimrc\n");
//! let targets: Vec<&str> = parsed.table.iter().map(|s| s.target.as_str()).collect();
//! assert_eq!(targets, [".zshrc", ".vim/.vimrc"]);
//! ```
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod logging;
pub mod resources;
pub mod tasks;
