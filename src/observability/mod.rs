//! Observability subsystem
//!
//! Structured JSON logging shared by every request stage.
//!
//! # Usage
//!
//! ```ignore
//! use json_api::observability::{Logger, Severity};
//!
//! Logger::set_min_severity(Severity::Debug);
//! Logger::info("DOCUMENT_SAVED", &[("key", "example")]);
//! ```

mod logger;

pub use logger::{Logger, RotatingFile, Severity};

use std::io;

use crate::config::LoggingConfig;

/// Install the minimum severity and the optional file sink described by `config`.
pub fn init(config: &LoggingConfig) -> io::Result<()> {
    Logger::set_min_severity(config.level);

    if let Some(path) = &config.file {
        let sink = RotatingFile::open(path, config.max_file_bytes, config.backup_count)?;
        Logger::attach_file(sink);
    }

    Ok(())
}
