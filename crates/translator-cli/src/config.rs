//! Process settings.

use std::path::PathBuf;
use std::sync::Arc;

use clap::ValueEnum;
use translator_runtime::{
    AgentBackend, ClaudeCodeBackend, OpenAiBackend, DEFAULT_OPENAI_BASE_URL,
};

use crate::error::CliError;

/// Which model backend answers the agents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum BackendKind {
    /// Claude Code CLI subprocess.
    #[default]
    Claude,
    /// OpenAI-compatible chat completions endpoint.
    Openai,
}

/// Settings shared by every command.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory holding `agents.yaml` and `tasks.yaml`.
    pub config_dir: PathBuf,

    /// Directory holding the kickoff checkpoint.
    pub state_dir: PathBuf,

    /// Directory generated output names and task output files are relative to.
    pub working_dir: PathBuf,

    pub backend: BackendKind,

    /// Default model for agents without an `llm` entry.
    pub model: Option<String>,

    /// Path to the claude CLI binary.
    pub claude_path: String,

    pub openai_base_url: String,

    pub openai_api_key: Option<String>,

    /// Training file whose feedback is applied to agent personas.
    pub trained_data: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            config_dir: PathBuf::from("config"),
            state_dir: PathBuf::from(".translator"),
            working_dir: PathBuf::from("."),
            backend: BackendKind::Claude,
            model: None,
            claude_path: "claude".to_string(),
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            openai_api_key: None,
            trained_data: None,
        }
    }
}

impl Settings {
    /// Construct the configured model backend.
    pub fn build_backend(&self) -> Result<Arc<dyn AgentBackend>, CliError> {
        match self.backend {
            BackendKind::Claude => {
                let mut backend = ClaudeCodeBackend::new(&self.claude_path)
                    .with_working_dir(&self.working_dir);
                if let Some(model) = &self.model {
                    backend = backend.with_model(model);
                }
                Ok(Arc::new(backend))
            }
            BackendKind::Openai => {
                let key = self
                    .openai_api_key
                    .as_deref()
                    .filter(|k| !k.trim().is_empty())
                    .ok_or_else(|| {
                        CliError::Setup(
                            "OPENAI_API_KEY must be set to use the openai backend".to_string(),
                        )
                    })?;
                let mut backend = OpenAiBackend::new(&self.openai_base_url, key);
                if let Some(model) = &self.model {
                    backend = backend.with_model(model);
                }
                Ok(Arc::new(backend))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.config_dir, PathBuf::from("config"));
        assert_eq!(settings.state_dir, PathBuf::from(".translator"));
        assert_eq!(settings.backend, BackendKind::Claude);
        assert_eq!(settings.openai_base_url, DEFAULT_OPENAI_BASE_URL);
    }

    #[test]
    fn test_backend_selection() {
        let claude = Settings::default().build_backend().unwrap();
        assert_eq!(claude.name(), "claude-code");

        let openai = Settings {
            backend: BackendKind::Openai,
            openai_api_key: Some("sk-test".to_string()),
            ..Settings::default()
        };
        assert_eq!(openai.build_backend().unwrap().name(), "openai");
    }

    #[test]
    fn test_openai_requires_key() {
        let settings = Settings {
            backend: BackendKind::Openai,
            ..Settings::default()
        };
        assert!(matches!(settings.build_backend(), Err(CliError::Setup(_))));
    }
}
