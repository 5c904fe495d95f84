//! # HTTP Server Module
//!
//! Exposes the document API over HTTP with axum.
//!
//! # Endpoints
//!
//! - `/` - root of the default document
//! - `/*json_path` - any node of any registered document

pub mod config;
mod document_routes;
pub mod server;

pub use config::HttpServerConfig;
pub use document_routes::document_routes;
pub use server::HttpServer;
