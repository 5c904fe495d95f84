//! API Layer
//!
//! Transport-neutral request pipeline. The HTTP server decodes method, path
//! and body into a [`Request`]; [`ApiHandler`] answers with a [`Response`]
//! whose status follows the document error taxonomy.
//!
//! # Supported Operations
//!
//! - read (GET)
//! - write (POST, PUT)
//! - delete (DELETE)

mod handler;
mod request;
mod response;

pub use handler::ApiHandler;
pub use request::Request;
pub use response::{ErrorResponse, Response};
