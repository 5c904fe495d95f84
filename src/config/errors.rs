//! Configuration error types
//!
//! All configuration errors are fatal at startup.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config '{path}': {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("Invalid config JSON: {0}")]
    Parse(String),

    #[error("Invalid config: {0}")]
    Invalid(String),

    #[error("No documents registered in api.files")]
    NoDocuments,
}

impl ConfigError {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::Read { .. } => "CONFIG_READ_FAILED",
            ConfigError::Parse(_) => "CONFIG_PARSE_FAILED",
            ConfigError::Invalid(_) => "CONFIG_INVALID",
            ConfigError::NoDocuments => "CONFIG_NO_DOCUMENTS",
        }
    }
}
