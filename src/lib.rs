//! json-api - JSON files served as path-addressable documents
//!
//! Every URL path addresses a node inside a registered JSON document. Reads
//! return the node, writes and deletes change the document on disk (checked
//! against its JSON schema) and announce the change as a retained MQTT
//! message.

pub mod api;
pub mod cli;
pub mod config;
pub mod document;
pub mod http_server;
pub mod observability;
pub mod publish;
pub mod schema;
