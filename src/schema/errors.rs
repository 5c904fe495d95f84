//! Schema error types
//!
//! Error codes:
//! - SCHEMA_NOT_FOUND: schema file missing
//! - SCHEMA_MALFORMED: schema file is not valid JSON
//! - SCHEMA_INVALID: schema JSON is not a usable JSON schema
//! - SCHEMA_VALIDATION_FAILED: document violates the schema

use std::fmt;

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Schema file does not exist
    SchemaNotFound,
    /// Schema file is not valid JSON
    SchemaMalformed,
    /// Schema could not be compiled
    SchemaInvalid,
    /// Document violates schema
    ValidationFailed,
}

impl SchemaErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::SchemaNotFound => "SCHEMA_NOT_FOUND",
            SchemaErrorCode::SchemaMalformed => "SCHEMA_MALFORMED",
            SchemaErrorCode::SchemaInvalid => "SCHEMA_INVALID",
            SchemaErrorCode::ValidationFailed => "SCHEMA_VALIDATION_FAILED",
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// One violated constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDetails {
    /// JSON pointer into the document (empty for the root)
    pub instance_path: String,
    /// Human-readable description of the violated constraint
    pub message: String,
}

impl ValidationDetails {
    pub fn new(instance_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            instance_path: instance_path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "at root: {}", self.message)
        } else {
            write!(f, "at '{}': {}", self.instance_path, self.message)
        }
    }
}

/// Schema error with full context
#[derive(Debug, Clone)]
pub struct SchemaError {
    /// Error code
    code: SchemaErrorCode,
    /// Human-readable message
    message: String,
    /// Schema file the error refers to
    location: String,
    /// Violations, for `ValidationFailed`
    details: Vec<ValidationDetails>,
}

impl SchemaError {
    /// Schema file missing
    pub fn not_found(location: impl Into<String>) -> Self {
        let location = location.into();
        Self {
            code: SchemaErrorCode::SchemaNotFound,
            message: format!("Schema file '{}' not found", location),
            location,
            details: Vec::new(),
        }
    }

    /// Schema file unreadable or not JSON
    pub fn malformed(location: impl Into<String>, reason: impl Into<String>) -> Self {
        let location = location.into();
        Self {
            code: SchemaErrorCode::SchemaMalformed,
            message: format!("Malformed schema file '{}': {}", location, reason.into()),
            location,
            details: Vec::new(),
        }
    }

    /// Schema could not be compiled
    pub fn invalid(location: impl Into<String>, reason: impl Into<String>) -> Self {
        let location = location.into();
        Self {
            code: SchemaErrorCode::SchemaInvalid,
            message: format!("Invalid JSON schema '{}': {}", location, reason.into()),
            location,
            details: Vec::new(),
        }
    }

    /// Document violates the schema
    pub fn validation_failed(location: impl Into<String>, details: Vec<ValidationDetails>) -> Self {
        let rendered: Vec<String> = details.iter().map(ToString::to_string).collect();
        Self {
            code: SchemaErrorCode::ValidationFailed,
            message: rendered.join("; "),
            location: location.into(),
            details,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the schema file
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Returns the violations
    pub fn details(&self) -> &[ValidationDetails] {
        &self.details
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(SchemaErrorCode::SchemaNotFound.code(), "SCHEMA_NOT_FOUND");
        assert_eq!(SchemaErrorCode::SchemaMalformed.code(), "SCHEMA_MALFORMED");
        assert_eq!(SchemaErrorCode::SchemaInvalid.code(), "SCHEMA_INVALID");
        assert_eq!(SchemaErrorCode::ValidationFailed.code(), "SCHEMA_VALIDATION_FAILED");
    }

    #[test]
    fn test_validation_message_lists_every_violation() {
        let err = SchemaError::validation_failed(
            "example.schema.json",
            vec![
                ValidationDetails::new("/node1", "\"x\" is not of type \"object\""),
                ValidationDetails::new("", "\"node2\" is a required property"),
            ],
        );
        assert_eq!(err.details().len(), 2);
        assert!(err.message().contains("at '/node1'"));
        assert!(err.message().contains("at root"));
        assert!(err.to_string().starts_with("SCHEMA_VALIDATION_FAILED"));
    }
}
