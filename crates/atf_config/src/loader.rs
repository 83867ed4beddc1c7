//! Option file loading.

use crate::error::ConfigError;
use crate::types::ConvertConfig;
use std::path::Path;

/// Loads an `atfconv.toml` file.
pub fn load_config(path: &Path) -> Result<ConvertConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    load_config_from_str(&content)
}

/// Parses `atfconv.toml` content from a string.
pub fn load_config_from_str(content: &str) -> Result<ConvertConfig, ConfigError> {
    toml::from_str(content).map_err(|e| ConfigError::Invalid(e.to_string()))
}
