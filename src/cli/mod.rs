//! CLI module for json-api
//!
//! Provides command-line interface for:
//! - serve: Boot and serve the document API over HTTP
//! - check: Validate configuration, documents and schemas

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{check, run, run_command, serve, verify_documents};
pub use errors::{CliError, CliErrorCode, CliResult};
