//! # Change Publication
//!
//! Successful mutations are announced on a message bus as retained messages,
//! one topic per mutated path. Publication is best effort: a disconnected
//! client skips the message, a rejected message is an error for the request.

mod client;
mod errors;
mod mqtt;
mod publisher;

pub use client::BusClient;
pub use errors::{PublishError, PublishResult};
pub use mqtt::{mqtt_options, MqttBus};
pub use publisher::{build_message, ChangePublisher, PublishMessage};
