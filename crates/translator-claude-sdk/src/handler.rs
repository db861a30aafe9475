//! Observers for messages streamed by Claude Code.

use async_trait::async_trait;
use tracing::{debug, trace};

use crate::error::SdkError;
use crate::types::ClaudeMessage;

/// Receives every message parsed from Claude's stdout, in order.
///
/// Handler errors are logged and do not abort the execution.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    /// Called when a message is received from Claude.
    async fn on_message(&self, message: &ClaudeMessage) -> Result<(), SdkError>;
}

/// A handler that only logs what it sees.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingHandler;

#[async_trait]
impl MessageHandler for TracingHandler {
    async fn on_message(&self, message: &ClaudeMessage) -> Result<(), SdkError> {
        match message {
            ClaudeMessage::System { session_id, model, .. } => {
                debug!(session_id = ?session_id, model = ?model, "Claude session initialized");
            }
            ClaudeMessage::Assistant { message, .. } => {
                debug!(content_count = message.content.len(), "Assistant message received");
            }
            ClaudeMessage::Result {
                is_error,
                duration_ms,
                ..
            } => {
                debug!(is_error = ?is_error, duration_ms = ?duration_ms, "Execution result received");
            }
            other => {
                trace!(message_type = other.kind(), "Ignoring message");
            }
        }
        Ok(())
    }
}
