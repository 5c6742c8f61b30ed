//! Typed failures for config loading, the link mapping file and link
//! creation.
//!
//! Each variant keeps its I/O or TOML cause in `source`, so callers that
//! want the whole chain print with `{:#}` after converting into
//! [`anyhow::Error`]. Messages name the path only and never repeat the cause.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that arise while resolving the run configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Neither `--home` nor the `HOME` environment variable is available.
    #[error("HOME environment variable is not set; pass --home")]
    HomeNotSet,

    /// The config file exists but could not be read.
    #[error("cannot read config file {}", path.display())]
    Io {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The config file is not valid TOML or has unexpected keys.
    #[error("invalid config file {}", path.display())]
    Parse {
        /// Path to the offending file.
        path: PathBuf,
        /// Underlying TOML error.
        source: toml::de::Error,
    },
}

/// Errors that arise from the link mapping file.
#[derive(Error, Debug)]
pub enum MappingError {
    /// The mapping file does not exist.
    #[error("mapping file not found: {}", path.display())]
    MissingFile {
        /// Expected location of the mapping file.
        path: PathBuf,
    },

    /// The mapping file exists but could not be read.
    #[error("failed to read mapping file {}", path.display())]
    Io {
        /// Path to the mapping file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A line could not be turned into a link entry.
    #[error("malformed mapping line {line}: {reason}: '{content}'")]
    MalformedLine {
        /// 1-based line number.
        line: usize,
        /// Raw line content.
        content: String,
        /// What is wrong with the line.
        reason: MalformedReason,
    },
}

/// Why a mapping line was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedReason {
    /// The line has no `->` delimiter.
    MissingDelimiter,
    /// Nothing before the delimiter.
    EmptySource,
    /// Nothing after the delimiter.
    EmptyTarget,
}

impl std::fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingDelimiter => write!(f, "missing '->' delimiter"),
            Self::EmptySource => write!(f, "empty source"),
            Self::EmptyTarget => write!(f, "empty target"),
        }
    }
}

/// Errors that arise while creating a single symlink.
#[derive(Error, Debug)]
pub enum LinkError {
    /// The directory that should contain the link could not be created.
    #[error("cannot create parent directory {}", path.display())]
    CreateParent {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The entry currently occupying the target could not be removed.
    #[error("cannot replace existing {}", path.display())]
    RemoveExisting {
        /// Path of the existing entry.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The symlink itself could not be created or moved into place.
    #[error("cannot link {} -> {}", target.display(), source_path.display())]
    CreateLink {
        /// Path the link points to.
        source_path: PathBuf,
        /// Path where the link should live.
        target: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Something other than a symlink sits at the staging name next to the
    /// target. It is left untouched.
    #[error("staging path {} is occupied by a non-symlink", path.display())]
    StagingOccupied {
        /// The staging path.
        path: PathBuf,
    },
}
