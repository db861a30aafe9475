//! Training support: human feedback sources and the training data file.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};
use tracing::{debug, info};
use translator_core::{Pipeline, TrainingData};

use crate::error::RuntimeError;

/// Supplies a reviewer's feedback on one task output.
#[async_trait]
pub trait FeedbackSource: Send {
    /// Return feedback for `output`; an empty string means no feedback.
    async fn feedback(
        &mut self,
        task_name: &str,
        agent_name: &str,
        output: &str,
    ) -> Result<String, RuntimeError>;
}

/// Asks for feedback on the terminal, one line per task.
pub struct StdinFeedback {
    lines: Lines<BufReader<Stdin>>,
}

impl StdinFeedback {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

impl Default for StdinFeedback {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FeedbackSource for StdinFeedback {
    async fn feedback(
        &mut self,
        task_name: &str,
        agent_name: &str,
        output: &str,
    ) -> Result<String, RuntimeError> {
        let banner = format!(
            "\n## Output of '{}' ({})\n{}\n\nProvide feedback to improve the agent (press Enter to skip):\n",
            task_name, agent_name, output
        );
        let mut stdout = tokio::io::stdout();
        stdout
            .write_all(banner.as_bytes())
            .await
            .map_err(RuntimeError::Feedback)?;
        stdout.flush().await.map_err(RuntimeError::Feedback)?;

        let line = self.lines.next_line().await.map_err(RuntimeError::Feedback)?;
        Ok(line.unwrap_or_default().trim().to_string())
    }
}

/// Load a training data file, or `None` if it does not exist.
pub fn load_training_data(path: &Path) -> Result<Option<TrainingData>, RuntimeError> {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(RuntimeError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    serde_json::from_str(&data)
        .map(Some)
        .map_err(|source| RuntimeError::Json {
            path: path.to_path_buf(),
            source,
        })
}

/// Write a training data file, replacing any previous content.
pub fn save_training_data(path: &Path, data: &TrainingData) -> Result<(), RuntimeError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| RuntimeError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let json = serde_json::to_string_pretty(data).map_err(|source| RuntimeError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json).map_err(|source| RuntimeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), iterations = data.iterations.len(), "Training data saved");
    Ok(())
}

/// Fold recorded feedback into the personas of the agents it was about.
pub fn apply_training(pipeline: &mut Pipeline, data: &TrainingData) {
    for agent in data.agents_with_feedback() {
        if let Some(guidance) = data.guidance_for(agent) {
            info!(agent = %agent, "Applying trained guidance");
            pipeline.add_agent_guidance(agent, &guidance);
        }
    }
}
