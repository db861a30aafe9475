//! Folding streamed messages into one answer.

use crate::error::SdkError;
use crate::executor::ExecutionResult;
use crate::types::ClaudeMessage;

/// Accumulates the messages of one execution.
///
/// The `result` message's text is the answer; assistant text is the
/// fallback when the CLI omits it.
#[derive(Debug, Default)]
pub struct Transcript {
    session_id: Option<String>,
    model: Option<String>,
    assistant_text: Vec<String>,
    result_text: Option<String>,
    duration_ms: Option<u64>,
    error: Option<String>,
    finished: bool,
}

impl Transcript {
    /// Create an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one message.
    pub fn observe(&mut self, message: &ClaudeMessage) {
        if self.session_id.is_none() {
            self.session_id = message.session_id().map(str::to_string);
        }

        match message {
            ClaudeMessage::System { model, .. } => {
                if model.is_some() {
                    self.model = model.clone();
                }
            }
            ClaudeMessage::Assistant { message, .. } => {
                if self.model.is_none() {
                    self.model = message.model.clone();
                }
                let text = message.text();
                if !text.is_empty() {
                    self.assistant_text.push(text);
                }
            }
            ClaudeMessage::Result {
                subtype,
                is_error,
                duration_ms,
                result,
                error,
                ..
            } => {
                self.finished = true;
                self.duration_ms = *duration_ms;
                self.result_text = result
                    .as_ref()
                    .and_then(|v| v.as_str())
                    .map(str::to_string);
                if is_error.unwrap_or(false) {
                    self.error = Some(
                        error
                            .clone()
                            .or_else(|| self.result_text.clone())
                            .or_else(|| subtype.clone())
                            .unwrap_or_else(|| "unknown error".to_string()),
                    );
                }
            }
            ClaudeMessage::User { .. } | ClaudeMessage::Unknown(_) => {}
        }
    }

    /// Returns true once a result message was seen.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Produce the final answer.
    pub fn finish(self) -> Result<ExecutionResult, SdkError> {
        if let Some(error) = self.error {
            return Err(SdkError::ExecutionFailed(error));
        }

        let text = match self.result_text {
            Some(text) if !text.trim().is_empty() => text,
            _ => self.assistant_text.join("\n\n"),
        };
        if text.trim().is_empty() {
            return Err(SdkError::EmptyResult);
        }

        Ok(ExecutionResult {
            session_id: self.session_id,
            model_used: self.model,
            duration_ms: self.duration_ms,
            text,
        })
    }
}
