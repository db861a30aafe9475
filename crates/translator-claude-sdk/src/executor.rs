//! Claude Code executor for running one-shot prompts via subprocess.
//!
//! This module provides the main `ClaudeExecutor` type. Each call spawns
//! `claude --print --output-format=stream-json`, writes the prompt to stdin,
//! and reads newline-delimited JSON messages from stdout until EOF.

use std::path::Path;
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::Command;
use tracing::{debug, error, info, warn};

use crate::error::SdkError;
use crate::handler::MessageHandler;
use crate::transcript::Transcript;
use crate::types::ClaudeMessage;

/// Result of a Claude Code execution.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// The session ID from Claude Code, if reported.
    pub session_id: Option<String>,

    /// The model that was used for execution, if reported.
    pub model_used: Option<String>,

    /// Duration of execution in milliseconds, if reported.
    pub duration_ms: Option<u64>,

    /// Final answer text.
    pub text: String,
}

/// Executor for one-shot Claude Code prompts.
#[derive(Debug, Clone)]
pub struct ClaudeExecutor {
    /// Path to the Claude CLI executable.
    claude_path: String,

    /// Model to use (optional).
    model: Option<String>,

    /// System prompt (optional).
    system_prompt: Option<String>,

    /// Maximum agentic turns (optional).
    max_turns: Option<u32>,

    /// Additional environment variables.
    env_vars: Vec<(String, String)>,
}

impl ClaudeExecutor {
    /// Create a new executor with the given path to the Claude CLI.
    ///
    /// The path can be just "claude" to use PATH lookup, or a full path.
    pub fn new(claude_path: impl Into<String>) -> Self {
        Self {
            claude_path: claude_path.into(),
            model: None,
            system_prompt: None,
            max_turns: None,
            env_vars: Vec::new(),
        }
    }

    /// Set the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set a system prompt.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Limit the number of agentic turns.
    pub fn with_max_turns(mut self, turns: u32) -> Self {
        self.max_turns = Some(turns);
        self
    }

    /// Add an environment variable.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.push((key.into(), value.into()));
        self
    }

    /// Build the subprocess command (without spawning it).
    fn command(&self, working_dir: &Path) -> Command {
        let mut cmd = Command::new(&self.claude_path);

        // stream-json output requires --verbose in print mode
        cmd.arg("--print")
            .arg("--output-format=stream-json")
            .arg("--verbose");

        if let Some(model) = &self.model {
            cmd.arg("--model").arg(model);
        }

        if let Some(system) = &self.system_prompt {
            cmd.arg("--system-prompt").arg(system);
        }

        if let Some(turns) = self.max_turns {
            cmd.arg("--max-turns").arg(turns.to_string());
        }

        for (key, value) in &self.env_vars {
            cmd.env(key, value);
        }

        // The prompt goes through stdin: a single argv string is capped at 128 KiB on Linux.
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .current_dir(working_dir)
            .kill_on_drop(true);

        cmd
    }

    /// Execute a prompt with Claude Code and return its final answer.
    ///
    /// The handler sees every parsed message before it is folded into the
    /// transcript.
    pub async fn execute(
        &self,
        working_dir: &Path,
        prompt: &str,
        handler: &dyn MessageHandler,
    ) -> Result<ExecutionResult, SdkError> {
        info!(
            claude_path = %self.claude_path,
            working_dir = %working_dir.display(),
            prompt_len = prompt.len(),
            model = ?self.model,
            "Spawning Claude process"
        );

        let mut cmd = self.command(working_dir);
        debug!("Full command: {:?}", cmd);

        let mut child = cmd.spawn().map_err(|e| {
            error!(error = %e, claude_path = %self.claude_path, "Failed to spawn Claude process");
            e
        })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| SdkError::ProtocolError("Failed to get stdin".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| SdkError::ProtocolError("Failed to get stdout".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| SdkError::ProtocolError("Failed to get stderr".to_string()))?;

        let prompt_owned = prompt.to_string();
        let writer = tokio::spawn(async move {
            stdin.write_all(prompt_owned.as_bytes()).await?;
            stdin.shutdown().await
        });

        // Spawn stderr reader for logging
        tokio::spawn(async move {
            let mut reader = BufReader::new(stderr);
            let mut line = String::new();
            loop {
                line.clear();
                match reader.read_line(&mut line).await {
                    Ok(0) => break,
                    Ok(_) => {
                        let trimmed = line.trim();
                        if !trimmed.is_empty() {
                            warn!(stderr = %trimmed, "Claude stderr");
                        }
                    }
                    Err(e) => {
                        error!(error = %e, "Error reading Claude stderr");
                        break;
                    }
                }
            }
        });

        let mut transcript = Transcript::new();
        let mut reader = BufReader::new(stdout);
        let mut line = String::new();
        let mut message_count = 0u64;

        loop {
            line.clear();
            let bytes = reader.read_line(&mut line).await?;
            if bytes == 0 {
                debug!(total_messages = message_count, "Claude stdout closed (EOF)");
                break;
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            message_count += 1;

            match serde_json::from_str::<ClaudeMessage>(trimmed) {
                Ok(message) => {
                    if let Err(e) = handler.on_message(&message).await {
                        warn!(error = %e, "Handler error processing message");
                    }
                    transcript.observe(&message);
                }
                Err(e) => {
                    let preview: String = trimmed.chars().take(200).collect();
                    warn!(error = %e, preview = %preview, "Failed to parse Claude message");
                }
            }
        }

        match writer.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(error = %e, "Failed to write prompt to Claude stdin"),
            Err(e) => warn!(error = %e, "Prompt writer task failed"),
        }

        let status = child.wait().await?;
        let exit_code = status.code().unwrap_or(-1);
        info!(exit_code = exit_code, messages = message_count, "Claude process exited");

        if !status.success() && !transcript.is_finished() {
            return Err(SdkError::ProcessError(format!(
                "Claude exited with code {}",
                exit_code
            )));
        }

        transcript.finish()
    }
}

impl Default for ClaudeExecutor {
    fn default() -> Self {
        Self::new("claude")
    }
}
