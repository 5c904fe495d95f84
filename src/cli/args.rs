//! CLI argument definitions using clap
//!
//! Commands:
//! - json-api serve --config <path> [--host <host>] [--port <port>]
//! - json-api check --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{CONFIG_FILE_ENV, DEFAULT_CONFIG_FILE};

/// json-api - serve JSON files as path-addressable documents
#[derive(Parser, Debug)]
#[command(name = "json-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server
    Serve {
        /// Path to configuration file
        #[arg(long, env = CONFIG_FILE_ENV, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,

        /// Override http.host
        #[arg(long)]
        host: Option<String>,

        /// Override http.port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Validate configuration, documents and schemas, then exit
    Check {
        /// Path to configuration file
        #[arg(long, env = CONFIG_FILE_ENV, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
