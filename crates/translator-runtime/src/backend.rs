//! The seam between the crew and whatever model answers its prompts.

use async_trait::async_trait;

use crate::error::BackendError;

/// One prompt for one step.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Agent performing the step.
    pub agent: String,

    /// Task being performed.
    pub task: String,

    /// Persona instructions.
    pub system: String,

    /// Task prompt including context.
    pub prompt: String,

    /// Model override for this agent, if any.
    pub model: Option<String>,
}

/// A model backend capable of answering one prompt at a time.
#[async_trait]
pub trait AgentBackend: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Produce the final answer text for a prompt.
    async fn complete(&self, request: CompletionRequest) -> Result<String, BackendError>;
}
