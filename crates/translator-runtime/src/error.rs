//! Runtime errors.

use std::path::PathBuf;

use thiserror::Error;
use translator_claude_sdk::SdkError;
use translator_core::CoreError;

/// Failure of a single model call.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Claude Code execution failed: {0}")]
    Sdk(#[from] SdkError),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Model returned an empty response")]
    EmptyResponse,
}

/// Errors raised while running, replaying or training the crew.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Config(#[from] CoreError),

    /// A task's model call failed; later tasks were not run.
    #[error("Task '{task}' failed: {source}")]
    Task {
        task: String,
        #[source]
        source: BackendError,
    },

    #[error("Failed to write output file {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("No recorded kickoff found at {0}")]
    NoRecordedKickoff(PathBuf),

    #[error("Replay requires a kickoff store")]
    NoCheckpointStore,

    #[error("Task id '{0}' not found in the last kickoff")]
    UnknownTaskId(String),

    /// The recorded task no longer exists in the configured pipeline.
    #[error("Task '{0}' from the last kickoff is not part of the current crew")]
    StaleTask(String),

    /// An earlier task has no completed output to feed the replay.
    #[error("Task '{0}' has no recorded output to replay from")]
    MissingOutput(String),

    #[error("Failed to read feedback: {0}")]
    Feedback(#[source] std::io::Error),

    #[error("Pipeline has no tasks")]
    EmptyPipeline,
}
