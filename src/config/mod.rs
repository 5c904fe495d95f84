//! Configuration loading and validation
//!
//! The configuration file path comes from `--config`, the `CONFIG_FILE`
//! environment variable, or `config.json`. `LOGGING_LEVEL` overrides
//! `logging.level`.

mod errors;
mod types;

pub use errors::{ConfigError, ConfigResult};
pub use types::{
    ApiConfig, Config, FileConfig, LoggingConfig, LoginConfig, MqttConfig, PublishConfig,
    TlsConfig, AUTO_CLIENT_ID,
};

use std::fs;
use std::path::Path;

use crate::observability::Severity;

/// Environment variable naming the configuration file
pub const CONFIG_FILE_ENV: &str = "CONFIG_FILE";

/// Environment variable overriding the log level
pub const LOGGING_LEVEL_ENV: &str = "LOGGING_LEVEL";

/// Default configuration file
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

impl Config {
    /// Load configuration from file, apply environment overrides, validate.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut config = Self::parse(&content)?;

        if let Ok(level) = std::env::var(LOGGING_LEVEL_ENV) {
            config.logging.level = level.parse::<Severity>().map_err(|e| {
                ConfigError::Invalid(format!("{}: {}", LOGGING_LEVEL_ENV, e))
            })?;
        }

        Ok(config)
    }

    /// Parse and validate configuration text (no environment overrides).
    pub fn parse(content: &str) -> ConfigResult<Self> {
        let config: Config =
            serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate cross-field constraints serde cannot express
    pub fn validate(&self) -> ConfigResult<()> {
        if self.api.files.is_empty() {
            return Err(ConfigError::NoDocuments);
        }

        for (key, file) in &self.api.files {
            if key.is_empty() || key.contains('/') || key.chars().any(char::is_whitespace) {
                return Err(ConfigError::Invalid(format!(
                    "document key '{}' must be a single path segment without whitespace",
                    key
                )));
            }
            if file.path.as_os_str().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "api.files.{}.path must not be empty",
                    key
                )));
            }
        }

        if self.mqtt.port == 0 {
            return Err(ConfigError::Invalid("mqtt.port must be in 1..=65535".into()));
        }

        if self.mqtt.enabled && self.mqtt.host.trim().is_empty() {
            return Err(ConfigError::Invalid("mqtt.host is required when mqtt is enabled".into()));
        }

        if self.mqtt.client_id.is_empty() {
            return Err(ConfigError::Invalid("mqtt.client_id must not be empty".into()));
        }

        if let Some(tls) = &self.mqtt.tls_config {
            if tls.certfile.is_some() != tls.keyfile.is_some() {
                return Err(ConfigError::Invalid(
                    "mqtt.tls_config.certfile and keyfile must be set together".into(),
                ));
            }
        }

        if self.http.port == 0 {
            return Err(ConfigError::Invalid("http.port must be in 1..=65535".into()));
        }

        Ok(())
    }
}
