//! Shared fixtures for the workspace integration tests
//!
//! Stand-ins for the chat platform: a message type carrying author and channel
//! identifiers and a replier that records everything sent through it.

use std::sync::Mutex;

use chatrouter::{BoxError, IncomingMessage, Replier};

/// An incoming chat message
#[derive(Debug, Clone)]
pub struct TestMessage {
    pub content: String,
    pub author: String,
    pub channel: String,
}

impl TestMessage {
    /// Create a message from a default author in a default channel
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            author: "user".to_string(),
            channel: "general".to_string(),
        }
    }

    /// Set the author
    pub fn from_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Set the channel
    pub fn in_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = channel.into();
        self
    }
}

impl IncomingMessage for TestMessage {
    fn content(&self) -> &str {
        &self.content
    }

    fn author_id(&self) -> &str {
        &self.author
    }

    fn channel_id(&self) -> &str {
        &self.channel
    }
}

/// A reply sent through [`RecordingReplier`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub channel: String,
    pub content: String,
}

/// Replier that keeps every message it was asked to send
#[derive(Debug, Default)]
pub struct RecordingReplier {
    sent: Mutex<Vec<SentMessage>>,
}

impl RecordingReplier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages sent so far, in order
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl Replier for RecordingReplier {
    fn send(&self, channel_id: &str, content: &str) -> Result<(), BoxError> {
        self.sent
            .lock()
            .map_err(|e| format!("Failed to acquire outbox lock: {}", e))?
            .push(SentMessage {
                channel: channel_id.to_string(),
                content: content.to_string(),
            });
        Ok(())
    }
}

/// Route router logs to the test output; safe to call from every test
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}
