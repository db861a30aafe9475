//! Claude Code backend.
//!
//! Each step is one `claude --print` invocation with the agent persona as the
//! system prompt. Agents have no tools, so a single turn is enough.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{debug, info};
use translator_claude_sdk::{ClaudeExecutor, TracingHandler};

use crate::backend::{AgentBackend, CompletionRequest};
use crate::error::BackendError;

/// Runs prompts through the Claude Code CLI.
#[derive(Debug, Clone)]
pub struct ClaudeCodeBackend {
    /// Path to the claude CLI binary.
    claude_path: String,

    /// Model used when the agent does not name one.
    default_model: Option<String>,

    /// Directory the CLI runs in.
    working_dir: PathBuf,
}

impl ClaudeCodeBackend {
    /// Create a backend using the given claude CLI path.
    pub fn new(claude_path: impl Into<String>) -> Self {
        Self {
            claude_path: claude_path.into(),
            default_model: None,
            working_dir: PathBuf::from("."),
        }
    }

    /// Builder method to set the default model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = Some(model.into());
        self
    }

    /// Builder method to set the working directory of the CLI.
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = dir.into();
        self
    }

    fn model_for<'a>(&'a self, request: &'a CompletionRequest) -> Option<&'a str> {
        request.model.as_deref().or(self.default_model.as_deref())
    }

    fn executor(&self, request: &CompletionRequest) -> ClaudeExecutor {
        let mut executor = ClaudeExecutor::new(&self.claude_path)
            .with_system_prompt(&request.system)
            .with_max_turns(1);
        if let Some(model) = self.model_for(request) {
            executor = executor.with_model(model);
        }
        executor
    }
}

#[async_trait]
impl AgentBackend for ClaudeCodeBackend {
    fn name(&self) -> &str {
        "claude-code"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, BackendError> {
        info!(
            agent = %request.agent,
            task = %request.task,
            model = ?self.model_for(&request),
            "Sending task to Claude Code"
        );
        debug!(prompt = %request.prompt, "Full prompt");

        let executor = self.executor(&request);
        let result = executor
            .execute(&self.working_dir, &request.prompt, &TracingHandler)
            .await?;

        info!(
            task = %request.task,
            session_id = ?result.session_id,
            model = ?result.model_used,
            duration_ms = ?result.duration_ms,
            output_len = result.text.len(),
            "Claude Code execution completed"
        );
        Ok(result.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use translator_claude_sdk::SdkError;

    fn request(model: Option<&str>) -> CompletionRequest {
        CompletionRequest {
            agent: "linguist".to_string(),
            task: "translation".to_string(),
            system: "You are a linguist.".to_string(),
            prompt: "Translate this.".to_string(),
            model: model.map(String::from),
        }
    }

    #[test]
    fn test_agent_model_overrides_default() {
        let backend = ClaudeCodeBackend::new("claude").with_model("sonnet");
        assert_eq!(backend.model_for(&request(None)), Some("sonnet"));
        assert_eq!(backend.model_for(&request(Some("opus"))), Some("opus"));
        assert_eq!(ClaudeCodeBackend::new("claude").model_for(&request(None)), None);
    }

    #[tokio::test]
    async fn test_missing_cli_is_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let backend = ClaudeCodeBackend::new("/nonexistent/claude-cli")
            .with_working_dir(dir.path());
        let err = backend.complete(request(None)).await.unwrap_err();
        assert!(matches!(err, BackendError::Sdk(SdkError::SpawnError(_))));
    }
}
