//! Agent configuration loading.
//!
//! Tunables live in a RON file holding an [`AgentConfig`]. Any field left out
//! of the file keeps its default.

use std::path::Path;

use conquest_core::config::AgentConfig;
use thiserror::Error;

/// Error type for configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// File not found.
    #[error("Config file not found: {0}")]
    FileNotFound(String),
    /// Failed to read file.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse RON.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] ron::error::SpannedError),
}

/// Load the agent configuration from a RON file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AgentConfig, ConfigError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }
    let contents = std::fs::read_to_string(path)?;
    config_from_ron_str(&contents)
}

/// Parse the agent configuration from a RON string.
pub fn config_from_ron_str(ron: &str) -> Result<AgentConfig, ConfigError> {
    let config: AgentConfig = ron::from_str(ron)?;
    Ok(config)
}
