//! Task step types.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One step of the pipeline, bound by name to the agent that performs it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSpec {
    /// Roster key (e.g. "translation").
    pub name: String,

    /// What the agent must do. May contain `{variable}` placeholders.
    pub description: String,

    /// Criteria for the final answer. May contain `{variable}` placeholders.
    pub expected_output: String,

    /// Name of the assigned agent.
    pub agent: String,

    /// Where the task's output is persisted, if anywhere.
    pub output_file: Option<PathBuf>,

    /// Earlier tasks whose outputs form this task's context.
    ///
    /// `None` means the accumulated output of every earlier task.
    pub context: Option<Vec<String>>,
}

impl TaskSpec {
    /// Create a new TaskSpec with minimal required fields.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        agent: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            expected_output: String::new(),
            agent: agent.into(),
            output_file: None,
            context: None,
        }
    }

    /// Builder method to set the expected output.
    pub fn with_expected_output(mut self, expected: impl Into<String>) -> Self {
        self.expected_output = expected.into();
        self
    }

    /// Builder method to set the output file.
    pub fn with_output_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_file = Some(path.into());
        self
    }

    /// Builder method to restrict context to named earlier tasks.
    pub fn with_context(mut self, tasks: Vec<String>) -> Self {
        self.context = Some(tasks);
        self
    }
}
