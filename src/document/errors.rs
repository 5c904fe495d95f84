//! # Document Request Errors
//!
//! Every failure is local to one request. `status_code` gives the HTTP
//! status the transport answers with.

use thiserror::Error;

use crate::schema::{SchemaError, SchemaErrorCode};

use super::mutator::Operation;

/// Result type for document operations
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Document request errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("Invalid path: {0}")]
    BadPath(String),

    #[error("Invalid JSON request body: {0}")]
    InvalidRequestBody(String),

    #[error("File \"{0}\" not found")]
    DocumentNotFound(String),

    #[error("Malformed JSON file \"{location}\". Please correct the file structure to be able to handle it. Detail: {reason}")]
    MalformedDocument { location: String, reason: String },

    #[error("Not found \"{0}\"")]
    NodeNotFound(String),

    #[error("List index \"{index}\" is out of range (len: {len})")]
    IndexNotFound { index: usize, len: usize },

    #[error("Operation \"{0}\" cannot be performed in JSON root node")]
    RootMutationForbidden(Operation),

    #[error("Request violates the validations defined by JSON schema: {0}")]
    SchemaViolation(String),

    #[error("Document saved but publishing the change failed: {0}")]
    PublishFailure(String),

    #[error("Failed to write \"{location}\": {reason}")]
    StorageFailure { location: String, reason: String },
}

impl DocumentError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            DocumentError::BadPath(_) => 400,
            DocumentError::InvalidRequestBody(_) => 400,
            DocumentError::DocumentNotFound(_) => 400,
            DocumentError::RootMutationForbidden(_) => 400,
            DocumentError::SchemaViolation(_) => 401,
            DocumentError::NodeNotFound(_) => 404,
            DocumentError::IndexNotFound { .. } => 404,
            DocumentError::MalformedDocument { .. } => 500,
            DocumentError::PublishFailure(_) => 500,
            DocumentError::StorageFailure { .. } => 500,
        }
    }

    /// Stable name of the error kind, used as a log field
    pub fn kind(&self) -> &'static str {
        match self {
            DocumentError::BadPath(_) => "BAD_PATH",
            DocumentError::InvalidRequestBody(_) => "INVALID_REQUEST_BODY",
            DocumentError::DocumentNotFound(_) => "DOCUMENT_NOT_FOUND",
            DocumentError::MalformedDocument { .. } => "MALFORMED_DOCUMENT",
            DocumentError::NodeNotFound(_) => "NODE_NOT_FOUND",
            DocumentError::IndexNotFound { .. } => "INDEX_NOT_FOUND",
            DocumentError::RootMutationForbidden(_) => "ROOT_MUTATION_FORBIDDEN",
            DocumentError::SchemaViolation(_) => "SCHEMA_VIOLATION",
            DocumentError::PublishFailure(_) => "PUBLISH_FAILURE",
            DocumentError::StorageFailure { .. } => "STORAGE_FAILURE",
        }
    }

    /// Lookup failures (404 class)
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DocumentError::NodeNotFound(_) | DocumentError::IndexNotFound { .. }
        )
    }
}

impl From<SchemaError> for DocumentError {
    fn from(err: SchemaError) -> Self {
        match err.code() {
            SchemaErrorCode::SchemaNotFound => {
                DocumentError::DocumentNotFound(err.location().to_string())
            }
            SchemaErrorCode::SchemaMalformed | SchemaErrorCode::SchemaInvalid => {
                DocumentError::MalformedDocument {
                    location: err.location().to_string(),
                    reason: err.message().to_string(),
                }
            }
            SchemaErrorCode::ValidationFailed => {
                DocumentError::SchemaViolation(err.message().to_string())
            }
        }
    }
}
