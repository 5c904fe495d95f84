//! Schema loader
//!
//! Schemas are plain JSON files read from disk on demand. They are never
//! cached: a schema edited on disk applies to the next save.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde_json::Value;

use super::errors::{SchemaError, SchemaResult};
use super::validator::SchemaValidator;

/// Reads schema files
#[derive(Debug, Default, Clone, Copy)]
pub struct SchemaLoader;

impl SchemaLoader {
    pub fn new() -> Self {
        Self
    }

    /// Read and parse a schema file.
    pub fn load(&self, path: &Path) -> SchemaResult<Value> {
        let location = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                SchemaError::not_found(&location)
            } else {
                SchemaError::malformed(&location, format!("Failed to read file: {}", e))
            }
        })?;

        serde_json::from_str(&content)
            .map_err(|e| SchemaError::malformed(&location, format!("Invalid JSON: {}", e)))
    }

    /// Read, parse and compile a schema file.
    pub fn load_validator(&self, path: &Path) -> SchemaResult<SchemaValidator> {
        let schema = self.load(path)?;
        SchemaValidator::compile(&schema, path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaErrorCode;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_load_schema_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("schema.json");
        fs::write(&path, r#"{"type": "object"}"#).unwrap();

        let schema = SchemaLoader::new().load(&path).unwrap();
        assert_eq!(schema, json!({"type": "object"}));
    }

    #[test]
    fn test_missing_schema_file() {
        let tmp = TempDir::new().unwrap();
        let err = SchemaLoader::new()
            .load(&tmp.path().join("missing.json"))
            .unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::SchemaNotFound);
    }

    #[test]
    fn test_malformed_schema_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("schema.json");
        fs::write(&path, "{ not json").unwrap();

        let err = SchemaLoader::new().load(&path).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::SchemaMalformed);
    }
}
