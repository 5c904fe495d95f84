//! Configuration file structure
//!
//! ```json
//! {
//!   "http":    { "host": "0.0.0.0", "port": 8000 },
//!   "logging": { "level": "info", "file": "logs/json-api.log" },
//!   "mqtt":    { "enabled": false, "publish": { "json_path_topic_depth": 0 } },
//!   "api":     { "files": { "example": { "path": "example.json", "default": true } } }
//! }
//! ```

use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{de, Deserialize, Deserializer};
use serde_json::Value;

use crate::http_server::HttpServerConfig;
use crate::observability::Severity;

/// Client id placeholder that requests a generated id
pub const AUTO_CLIENT_ID: &str = "<auto>";

/// Top-level configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// HTTP listener (optional)
    #[serde(default)]
    pub http: HttpServerConfig,

    /// Logging (optional)
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Message bus (required)
    pub mqtt: MqttConfig,

    /// Served documents (required)
    pub api: ApiConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Minimum severity, as a name or a numeric level (default: info)
    #[serde(default = "default_log_level", deserialize_with = "deserialize_severity")]
    pub level: Severity,

    /// Log file; records also go to stdout/stderr
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Rotate the log file past this size, 0 disables (default: 5 MiB)
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,

    /// Rotated files to keep (default: 2)
    #[serde(default = "default_backup_count")]
    pub backup_count: usize,
}

fn default_log_level() -> Severity {
    Severity::Info
}

fn default_max_file_bytes() -> u64 {
    5_242_880
}

fn default_backup_count() -> usize {
    2
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
            max_file_bytes: default_max_file_bytes(),
            backup_count: default_backup_count(),
        }
    }
}

fn deserialize_severity<'de, D>(deserializer: D) -> Result<Severity, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    let text = match raw {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        other => return Err(de::Error::custom(format!("invalid log level: {}", other))),
    };
    text.parse().map_err(de::Error::custom)
}

/// Message bus configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MqttConfig {
    /// Whether changes are published (required)
    pub enabled: bool,

    /// Broker host (default: "127.0.0.1")
    #[serde(default = "default_mqtt_host")]
    pub host: String,

    /// Broker port (default: 1883)
    #[serde(default = "default_mqtt_port")]
    pub port: u16,

    /// Client id, `<auto>` generates one at startup
    #[serde(default = "default_client_id")]
    pub client_id: String,

    /// Keep-alive interval in seconds (default: 60)
    #[serde(default = "default_keep_alive_secs")]
    pub keep_alive_secs: u64,

    /// TLS material; plain TCP when absent
    #[serde(default)]
    pub tls_config: Option<TlsConfig>,

    /// Username/password authentication
    #[serde(default)]
    pub login: Option<LoginConfig>,

    /// Topic and payload derivation
    #[serde(default)]
    pub publish: PublishConfig,
}

fn default_mqtt_host() -> String {
    "127.0.0.1".to_string()
}

fn default_mqtt_port() -> u16 {
    1883
}

fn default_client_id() -> String {
    AUTO_CLIENT_ID.to_string()
}

fn default_keep_alive_secs() -> u64 {
    60
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            host: default_mqtt_host(),
            port: default_mqtt_port(),
            client_id: default_client_id(),
            keep_alive_secs: default_keep_alive_secs(),
            tls_config: None,
            login: None,
            publish: PublishConfig::default(),
        }
    }
}

impl MqttConfig {
    /// Resolve the client id, generating one for `<auto>`.
    pub fn resolved_client_id(&self) -> String {
        if self.client_id == AUTO_CLIENT_ID {
            uuid::Uuid::new_v4().simple().to_string()
        } else {
            self.client_id.clone()
        }
    }
}

/// TLS files for the broker connection
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TlsConfig {
    /// CA bundle (PEM)
    pub ca_certs: PathBuf,

    /// Client certificate (PEM), requires `keyfile`
    #[serde(default)]
    pub certfile: Option<PathBuf>,

    /// Client private key (PEM), requires `certfile`
    #[serde(default)]
    pub keyfile: Option<PathBuf>,
}

/// Broker credentials
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginConfig {
    pub username: String,
    pub password: String,
}

/// Publication settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PublishConfig {
    /// Prepended to every topic when non-empty
    #[serde(default)]
    pub topic_prefix: String,

    /// Truncate topic and payload to this many path segments, 0 = full path
    #[serde(default)]
    pub json_path_topic_depth: usize,

    /// Carry the document key in the payload instead of the topic
    #[serde(default)]
    pub request_file_in_message_content: bool,
}

/// Served documents
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// Document key -> storage, in registration order
    pub files: IndexMap<String, FileConfig>,
}

/// One served document
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// JSON file backing the document
    pub path: PathBuf,

    /// JSON schema checked on save; empty string means none
    #[serde(default, deserialize_with = "deserialize_optional_path")]
    pub schema: Option<PathBuf>,

    /// Serve this document when the path names no document
    #[serde(default)]
    pub default: bool,
}

fn deserialize_optional_path<'de, D>(deserializer: D) -> Result<Option<PathBuf>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.is_empty()).map(PathBuf::from))
}
