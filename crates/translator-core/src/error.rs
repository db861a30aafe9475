//! Core domain errors.

use std::path::PathBuf;

use thiserror::Error;

/// Core domain errors for the translation crew.
///
/// Every variant is fatal for pipeline construction: no partial pipeline is
/// ever handed to the runtime.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The blueprint requires an agent the roster does not declare.
    #[error("Agent '{0}' is not declared in the agent roster")]
    MissingAgent(String),

    /// The blueprint requires a task the roster does not declare.
    #[error("Task '{0}' is not declared in the task roster")]
    MissingTask(String),

    /// A task is assigned to an agent that is not part of the crew.
    #[error("Task '{task}' is assigned to unknown agent '{agent}'")]
    UnknownAgent { task: String, agent: String },

    /// A task lists context that does not come from an earlier task.
    #[error("Task '{task}' takes context from '{context}', which is not an earlier task")]
    InvalidContext { task: String, context: String },

    /// A `{placeholder}` has no matching run input.
    #[error("Template variable '{0}' not found in run inputs")]
    MissingVariable(String),

    /// A roster document is malformed or has an empty required field.
    #[error("Invalid configuration in {path}: {message}")]
    InvalidConfig { path: PathBuf, message: String },

    /// A roster document could not be read.
    #[error("Failed to read configuration {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
