//! Change publisher
//!
//! Turns a successful mutation into a retained bus message. The topic is the
//! mutation path (optionally truncated to `json_path_topic_depth` segments),
//! preceded by the document key and the configured prefix. The payload is
//! the post-mutation subtree at the truncated path, or empty for deletes so
//! the retained value on that topic is cleared.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::config::PublishConfig;
use crate::document::{mutator, JsonPath};

use super::client::BusClient;
use super::errors::{PublishError, PublishResult};

/// A message ready to hand to the bus
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishMessage {
    pub topic: String,
    pub payload: Vec<u8>,
}

/// Derive topic and payload for a change.
///
/// `post` is the whole document after the mutation, `None` for deletes.
pub fn build_message(
    document_key: &str,
    path: &JsonPath,
    post: Option<&Value>,
    settings: &PublishConfig,
) -> PublishResult<PublishMessage> {
    let path = path.truncated(settings.json_path_topic_depth);

    let mut topic_segments: Vec<&str> = Vec::with_capacity(path.len() + 2);
    if !settings.topic_prefix.is_empty() {
        topic_segments.push(&settings.topic_prefix);
    }
    if !settings.request_file_in_message_content {
        topic_segments.push(document_key);
    }
    topic_segments.extend(path.iter());

    if topic_segments.is_empty() {
        return Err(PublishError::EmptyTopic);
    }

    let payload = match post {
        None => Vec::new(),
        Some(document) => {
            let subtree = mutator::read(document, &path)
                .map_err(|_| PublishError::MissingSubtree(path.to_string()))?;
            let body = if settings.request_file_in_message_content {
                serde_json::to_vec(&json!({ "file": document_key, "json": subtree }))
            } else {
                serde_json::to_vec(subtree)
            };
            body.map_err(|e| PublishError::Serialize(e.to_string()))?
        }
    };

    Ok(PublishMessage {
        topic: topic_segments.join("/"),
        payload,
    })
}

/// Publishes document changes through a [`BusClient`]
#[derive(Clone)]
pub struct ChangePublisher {
    client: Arc<dyn BusClient>,
    settings: PublishConfig,
}

impl ChangePublisher {
    pub fn new(client: Arc<dyn BusClient>, settings: PublishConfig) -> Self {
        Self { client, settings }
    }

    pub fn settings(&self) -> &PublishConfig {
        &self.settings
    }

    /// Publish a change. Returns `Ok(false)` when the client is not
    /// connected; nothing is sent in that case.
    pub fn publish(
        &self,
        document_key: &str,
        path: &JsonPath,
        post: Option<&Value>,
    ) -> PublishResult<bool> {
        if !self.client.is_connected() {
            return Ok(false);
        }

        let message = build_message(document_key, path, post, &self.settings)?;
        self.client.publish_retained(&message.topic, message.payload)?;
        Ok(true)
    }
}

impl std::fmt::Debug for ChangePublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangePublisher")
            .field("connected", &self.client.is_connected())
            .field("settings", &self.settings)
            .finish()
    }
}
