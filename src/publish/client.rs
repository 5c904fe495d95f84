//! # Bus Client Trait

use super::errors::PublishResult;

/// Message bus the publisher hands messages to
pub trait BusClient: Send + Sync {
    /// Whether the client currently holds a broker session
    fn is_connected(&self) -> bool;

    /// Queue a retained message. An empty payload clears the retained value.
    fn publish_retained(&self, topic: &str, payload: Vec<u8>) -> PublishResult<()>;
}
