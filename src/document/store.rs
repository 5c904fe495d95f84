//! Document persistence
//!
//! Documents are loaded fresh from disk on every request. Saves validate the
//! whole document against its schema first and then replace the file
//! atomically: write a sibling temp file, fsync, rename over the target,
//! fsync the directory. A reader never observes a half-written document.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

use crate::schema::SchemaLoader;

use super::errors::{DocumentError, DocumentResult};

/// Indentation used when saving documents
const INDENT: &[u8] = b" ";

/// Loads and saves JSON documents
#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentStore {
    schemas: SchemaLoader,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self {
            schemas: SchemaLoader::new(),
        }
    }

    /// Read and parse the document at `location`.
    pub fn load(&self, location: &Path) -> DocumentResult<Value> {
        let content = fs::read_to_string(location).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                DocumentError::DocumentNotFound(location.display().to_string())
            } else {
                storage_failure(location, e)
            }
        })?;

        serde_json::from_str(&content).map_err(|e| DocumentError::MalformedDocument {
            location: location.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Validate `document` against `schema` (when given) and write it to
    /// `location`. The existing file is untouched when validation fails.
    pub fn save(
        &self,
        document: &Value,
        location: &Path,
        schema: Option<&Path>,
    ) -> DocumentResult<()> {
        if let Some(schema) = schema {
            self.validate(document, schema)?;
        }

        let content = render(document).map_err(|e| storage_failure(location, e))?;
        write_atomic(location, &content)
    }

    /// Check `document` against the schema file at `schema`.
    pub fn validate(&self, document: &Value, schema: &Path) -> DocumentResult<()> {
        let validator = self.schemas.load_validator(schema)?;
        validator.validate(document)?;
        Ok(())
    }
}

/// Serialize with single-space indentation, keeping key order.
fn render(document: &Value) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    document.serialize(&mut serializer)?;
    Ok(buf)
}

fn temp_path(location: &Path) -> PathBuf {
    let mut name = location
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    location.with_file_name(name)
}

fn write_atomic(location: &Path, content: &[u8]) -> DocumentResult<()> {
    let temp = temp_path(location);

    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp)
        .map_err(|e| storage_failure(location, e))?;

    let written = file
        .write_all(content)
        .and_then(|()| file.sync_all())
        .and_then(|()| fs::rename(&temp, location));

    if let Err(e) = written {
        let _ = fs::remove_file(&temp);
        return Err(storage_failure(location, e));
    }

    // fsync the directory so the rename survives a crash
    let parent = match location.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    if let Ok(dir) = File::open(parent) {
        let _ = dir.sync_all();
    }

    Ok(())
}

fn storage_failure(location: &Path, err: impl std::fmt::Display) -> DocumentError {
    DocumentError::StorageFailure {
        location: location.display().to_string(),
        reason: err.to_string(),
    }
}
