//! API Handler
//!
//! Runs one request through the document pipeline:
//!
//! 1. Parse the path and pick the target document
//! 2. Parse the body (writes only)
//! 3. Take the document lock
//! 4. Load the document
//! 5. Read, or mutate (whole-document replace for a root write)
//! 6. Validate and save
//! 7. Publish the change when a publisher is configured
//!
//! The lock is held from step 3 until the response is built, so changes to
//! one document are applied one request at a time. Everything here blocks;
//! async callers run it on a blocking thread.

use std::sync::Arc;

use serde_json::Value;

use crate::document::{
    mutator, DocumentEntry, DocumentError, DocumentRegistry, DocumentResult, DocumentStore,
    JsonPath, Operation,
};
use crate::observability::Logger;
use crate::publish::ChangePublisher;

use super::request::Request;
use super::response::Response;

/// Document request handler
#[derive(Debug)]
pub struct ApiHandler {
    registry: Arc<DocumentRegistry>,
    store: DocumentStore,
    publisher: Option<ChangePublisher>,
}

impl ApiHandler {
    /// Create a handler that does not publish changes
    pub fn new(registry: Arc<DocumentRegistry>) -> Self {
        Self {
            registry,
            store: DocumentStore::new(),
            publisher: None,
        }
    }

    /// Publish every successful mutation through `publisher`
    pub fn with_publisher(mut self, publisher: ChangePublisher) -> Self {
        self.publisher = Some(publisher);
        self
    }

    pub fn registry(&self) -> &DocumentRegistry {
        &self.registry
    }

    /// Handle a request, mapping failures to error responses
    pub fn handle(&self, request: &Request) -> Response {
        match self.execute(request) {
            Ok(Some(data)) => Response::success(data),
            Ok(None) => Response::ok(),
            Err(e) => {
                log_failure(request, &e);
                Response::error(&e)
            }
        }
    }

    /// Returns the read value for reads, `None` for successful mutations
    fn execute(&self, request: &Request) -> DocumentResult<Option<Value>> {
        let operation = request.operation;
        let path = JsonPath::parse(&request.path)?;
        let (entry, path) = self.registry.resolve(path);

        let value = match operation {
            Operation::Write => Some(request.json_body()?),
            _ => None,
        };

        let path_text = path.to_string();
        Logger::debug(
            "REQUEST_RESOLVED",
            &[
                ("operation", operation.as_str()),
                ("document", &entry.key),
                ("path", &path_text),
            ],
        );

        let _guard = self.registry.lock(&entry.key);

        let mut document = self.store.load(&entry.location)?;

        if !operation.is_mutation() {
            return mutator::read(&document, &path).map(|found| Some(found.clone()));
        }

        match value {
            Some(value) if path.is_root() => document = value,
            value => {
                mutator::apply(&mut document, &path, operation, value)?;
            }
        }

        let location = entry.location.display().to_string();
        Logger::debug(
            "DOCUMENT_SAVING",
            &[("document", &entry.key), ("location", &location)],
        );
        self.store
            .save(&document, &entry.location, entry.schema_path())?;

        self.publish(entry, &path, operation, &document)?;
        Ok(None)
    }

    fn publish(
        &self,
        entry: &DocumentEntry,
        path: &JsonPath,
        operation: Operation,
        document: &Value,
    ) -> DocumentResult<()> {
        let Some(publisher) = &self.publisher else {
            return Ok(());
        };

        let post = (operation != Operation::Delete).then_some(document);
        let path_text = path.to_string();
        let fields = [("document", entry.key.as_str()), ("path", path_text.as_str())];

        match publisher.publish(&entry.key, path, post) {
            Ok(true) => {
                Logger::debug("CHANGE_PUBLISHED", &fields);
                Ok(())
            }
            Ok(false) => {
                Logger::warn("CHANGE_NOT_PUBLISHED_DISCONNECTED", &fields);
                Ok(())
            }
            Err(e) => {
                let reason = e.to_string();
                Logger::error(
                    "CHANGE_PUBLISH_FAILED",
                    &[fields[0], fields[1], ("reason", &reason)],
                );
                Err(e.into())
            }
        }
    }
}

fn log_failure(request: &Request, err: &DocumentError) {
    let status = err.status_code().to_string();
    let message = err.to_string();
    let fields = [
        ("operation", request.operation.as_str()),
        ("path", request.path.as_str()),
        ("kind", err.kind()),
        ("status", status.as_str()),
        ("message", message.as_str()),
    ];

    match err {
        DocumentError::SchemaViolation(_) => Logger::info("REQUEST_FAILED", &fields),
        // publish failures are logged where they happen
        DocumentError::PublishFailure(_) => {}
        e if e.status_code() >= 500 => Logger::error("REQUEST_FAILED", &fields),
        _ => Logger::warn("REQUEST_FAILED", &fields),
    }
}
