//! Document registry
//!
//! Maps document keys to their backing file and optional schema, picks the
//! document a request targets, and owns one lock per backing file so that a
//! request's load, mutate, save and publish sequence never interleaves with
//! another request on the same file. Keys sharing a file share its lock.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use indexmap::IndexMap;

use crate::config::{ApiConfig, ConfigError, ConfigResult};

use super::path::JsonPath;

/// A registered document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentEntry {
    pub key: String,
    pub location: PathBuf,
    pub schema: Option<PathBuf>,
    pub is_default: bool,
}

impl DocumentEntry {
    pub fn new(key: impl Into<String>, location: impl Into<PathBuf>) -> Self {
        Self {
            key: key.into(),
            location: location.into(),
            schema: None,
            is_default: false,
        }
    }

    pub fn with_schema(mut self, schema: impl Into<PathBuf>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }

    pub fn schema_path(&self) -> Option<&Path> {
        self.schema.as_deref()
    }
}

/// Registered documents in registration order
#[derive(Debug)]
pub struct DocumentRegistry {
    documents: IndexMap<String, DocumentEntry>,
    default_key: String,
    locks: HashMap<PathBuf, Mutex<()>>,
}

impl DocumentRegistry {
    /// Build a registry. The default document is the last entry flagged as
    /// default, or the first entry when none is.
    pub fn new(entries: impl IntoIterator<Item = DocumentEntry>) -> ConfigResult<Self> {
        let mut documents = IndexMap::new();
        for entry in entries {
            documents.insert(entry.key.clone(), entry);
        }

        let default_key = documents
            .values()
            .rev()
            .find(|entry| entry.is_default)
            .or_else(|| documents.values().next())
            .map(|entry| entry.key.clone())
            .ok_or(ConfigError::NoDocuments)?;

        let locks = documents
            .values()
            .map(|entry| (entry.location.clone(), Mutex::new(())))
            .collect();

        Ok(Self {
            documents,
            default_key,
            locks,
        })
    }

    /// Build a registry from the `api.files` section
    pub fn from_config(config: &ApiConfig) -> ConfigResult<Self> {
        Self::new(config.files.iter().map(|(key, file)| DocumentEntry {
            key: key.clone(),
            location: file.path.clone(),
            schema: file.schema.clone(),
            is_default: file.default,
        }))
    }

    /// Pick the target document for `path`.
    ///
    /// A first segment naming a registered document selects it and is
    /// consumed; anything else targets the default document with the path
    /// unchanged.
    pub fn resolve(&self, path: JsonPath) -> (&DocumentEntry, JsonPath) {
        if let Some(entry) = path.first().and_then(|key| self.documents.get(key)) {
            return (entry, path.without_first());
        }
        (self.default_document(), path)
    }

    pub fn default_document(&self) -> &DocumentEntry {
        &self.documents[&self.default_key]
    }

    pub fn get(&self, key: &str) -> Option<&DocumentEntry> {
        self.documents.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DocumentEntry> {
        self.documents.values()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Acquire the lock of the document's backing file. Returns `None` for
    /// unknown keys.
    pub fn lock(&self, key: &str) -> Option<MutexGuard<'_, ()>> {
        let entry = self.documents.get(key)?;
        self.locks
            .get(&entry.location)
            .map(|lock| lock.lock().unwrap_or_else(PoisonError::into_inner))
    }
}
