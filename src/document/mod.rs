//! # Documents
//!
//! Path-addressable JSON documents backed by files.
//!
//! - [`JsonPath`]: the part of a request URL that addresses a node
//! - [`DocumentRegistry`]: which document a path targets
//! - [`mutator`]: read, write and delete over an in-memory tree
//! - [`DocumentStore`]: load, validate and atomically save

mod errors;
pub mod mutator;
mod path;
mod registry;
mod store;

pub use errors::{DocumentError, DocumentResult};
pub use mutator::{Applied, Operation};
pub use path::JsonPath;
pub use registry::{DocumentEntry, DocumentRegistry};
pub use store::DocumentStore;
