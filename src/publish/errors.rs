//! # Publish Errors

use thiserror::Error;

use crate::document::DocumentError;

/// Result type for publish operations
pub type PublishResult<T> = Result<T, PublishError>;

/// Change publication errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PublishError {
    #[error("Cannot publish: derived topic is empty")]
    EmptyTopic,

    #[error("Node \"{0}\" is not present in the updated document")]
    MissingSubtree(String),

    #[error("Failed to serialize payload: {0}")]
    Serialize(String),

    #[error("Bus client rejected message for \"{topic}\": {reason}")]
    Rejected { topic: String, reason: String },

    #[error("Bus client setup failed: {0}")]
    Setup(String),
}

impl From<PublishError> for DocumentError {
    fn from(err: PublishError) -> Self {
        DocumentError::PublishFailure(err.to_string())
    }
}
