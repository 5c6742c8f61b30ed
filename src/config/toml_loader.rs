//! TOML configuration file loading.
use serde::de::DeserializeOwned;
use std::path::Path;

use crate::error::ConfigError;

/// Load a TOML config file into `T`.
///
/// A missing file is not an error: the result is `T::default()`, so every
/// setting falls back to its built-in value.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file exists but cannot be read, and
/// [`ConfigError::Parse`] if it is not valid for `T`.
pub fn load_config<T: DeserializeOwned + Default>(path: &Path) -> Result<T, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(T::default()),
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
