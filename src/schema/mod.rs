//! Schema validation subsystem
//!
//! A document may name a JSON schema file. The schema is loaded and checked
//! against the whole document on every save, never on load.
//!
//! - Violations abort the save, the file on disk is left untouched
//! - Every violated constraint is reported
//! - Validation is deterministic

mod errors;
mod loader;
mod validator;

pub use errors::{SchemaError, SchemaErrorCode, SchemaResult, ValidationDetails};
pub use loader::SchemaLoader;
pub use validator::SchemaValidator;
