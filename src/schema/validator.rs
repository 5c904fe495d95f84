//! JSON schema validation of whole documents before they are saved.

use serde_json::Value;

use super::errors::{SchemaError, SchemaResult, ValidationDetails};

/// A compiled JSON schema
pub struct SchemaValidator {
    validator: jsonschema::Validator,
    location: String,
}

impl SchemaValidator {
    /// Compile `schema`. `location` names the schema in error messages.
    pub fn compile(schema: &Value, location: impl Into<String>) -> SchemaResult<Self> {
        let location = location.into();
        let validator = jsonschema::Validator::new(schema)
            .map_err(|e| SchemaError::invalid(&location, e.to_string()))?;
        Ok(Self {
            validator,
            location,
        })
    }

    /// Validate a document, reporting every violated constraint.
    pub fn validate(&self, document: &Value) -> SchemaResult<()> {
        if self.validator.is_valid(document) {
            return Ok(());
        }

        let details: Vec<ValidationDetails> = self
            .validator
            .iter_errors(document)
            .map(|e| ValidationDetails::new(e.instance_path.to_string(), e.to_string()))
            .collect();

        Err(SchemaError::validation_failed(&self.location, details))
    }

    pub fn location(&self) -> &str {
        &self.location
    }
}

impl std::fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaValidator")
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}
