//! Error types for the Claude Code SDK.

use thiserror::Error;

/// Errors that can occur during Claude Code SDK operations.
#[derive(Debug, Error)]
pub enum SdkError {
    /// Failed to spawn the Claude process or talk to its pipes.
    #[error("Failed to run Claude process: {0}")]
    SpawnError(#[from] std::io::Error),

    /// Claude process exited with an error.
    #[error("Claude process exited with error: {0}")]
    ProcessError(String),

    /// Claude reported a failed execution in its result message.
    #[error("Claude execution failed: {0}")]
    ExecutionFailed(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Protocol error during communication.
    #[error("Protocol error: {0}")]
    ProtocolError(String),

    /// The execution finished without producing any text.
    #[error("Claude returned an empty answer")]
    EmptyResult,
}
