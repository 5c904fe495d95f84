//! CLI command implementations
//!
//! Boot sequence for `serve`:
//! 1. Load and validate configuration
//! 2. Initialise logging
//! 3. Verify every document and schema loads
//! 4. Build the registry, the MQTT client (when enabled) and the handler
//! 5. Serve HTTP
//!
//! `check` runs steps 1 to 3 and exits.

use std::path::Path;
use std::sync::Arc;

use crate::api::ApiHandler;
use crate::config::Config;
use crate::document::{DocumentRegistry, DocumentStore};
use crate::http_server::HttpServer;
use crate::observability::{self, Logger};
use crate::publish::{ChangePublisher, MqttBus};
use crate::schema::SchemaLoader;

use super::args::Command;
use super::errors::{CliError, CliResult};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { config, host, port } => serve(&config, host, port),
        Command::Check { config } => check(&config),
    }
}

/// Boot and serve until the process is stopped
pub fn serve(config_path: &Path, host: Option<String>, port: Option<u16>) -> CliResult<()> {
    let mut config = boot(config_path)?;
    if let Some(host) = host {
        config.http.host = host;
    }
    if let Some(port) = port {
        config.http.port = port;
    }

    let registry = Arc::new(DocumentRegistry::from_config(&config.api)?);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async move {
        let mut handler = ApiHandler::new(registry);

        if config.mqtt.enabled {
            let bus = MqttBus::start(&config.mqtt)?;
            handler =
                handler.with_publisher(ChangePublisher::new(bus, config.mqtt.publish.clone()));
        } else {
            Logger::info("MQTT_DISABLED", &[]);
        }

        HttpServer::with_config(config.http, Arc::new(handler))
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Validate configuration, documents and schemas
pub fn check(config_path: &Path) -> CliResult<()> {
    let config = boot(config_path)?;
    println!(
        "{}: configuration valid, {} document(s) verified",
        config_path.display(),
        config.api.files.len()
    );
    Ok(())
}

/// Steps shared by every command: config, logging, document verification.
fn boot(config_path: &Path) -> CliResult<Config> {
    let config = Config::load(config_path)?;

    observability::init(&config.logging)
        .map_err(|e| CliError::boot_failed(format!("Failed to open log file: {}", e)))?;

    let path_text = config_path.display().to_string();
    Logger::info("CONFIG_LOADED", &[("path", &path_text)]);

    let registry = DocumentRegistry::from_config(&config.api)?;
    verify_documents(&registry)?;

    Ok(config)
}

/// Load every registered document and compile every schema.
pub fn verify_documents(registry: &DocumentRegistry) -> CliResult<()> {
    let store = DocumentStore::new();
    let schemas = SchemaLoader::new();

    for entry in registry.iter() {
        store.load(&entry.location).map_err(|e| {
            CliError::document_invalid(format!("Document '{}': {}", entry.key, e))
        })?;

        if let Some(schema) = entry.schema_path() {
            schemas.load_validator(schema).map_err(|e| {
                CliError::document_invalid(format!("Schema of document '{}': {}", entry.key, e))
            })?;
        }

        let location = entry.location.display().to_string();
        Logger::debug(
            "DOCUMENT_VERIFIED",
            &[("document", &entry.key), ("location", &location)],
        );
    }

    Ok(())
}
