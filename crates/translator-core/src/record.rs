//! Execution records: what a kickoff did, task by task.
//!
//! A [`KickoffLog`] is checkpointed after every step so a later `replay` can
//! restart from any recorded task.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{RunId, RunInputs, TaskId};

/// Status of one task execution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Not started yet.
    #[default]
    Pending,
    /// Waiting on the model backend.
    Running,
    /// Produced an output.
    Completed,
    /// Failed; the rest of the pipeline was aborted.
    Failed,
}

impl TaskStatus {
    /// Returns true if the task finished, successfully or not.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Record of one task execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Id accepted by `replay`.
    pub task_id: TaskId,

    /// Task roster key.
    pub task_name: String,

    /// Agent that performed the task.
    pub agent_name: String,

    /// Current status.
    pub status: TaskStatus,

    /// Raw output text once completed.
    pub output: Option<String>,

    /// When the backend call started.
    pub started_at: Option<DateTime<Utc>>,

    /// When the task reached a terminal state.
    pub finished_at: Option<DateTime<Utc>>,

    /// Error message if the task failed.
    pub error_message: Option<String>,
}

impl TaskRecord {
    /// Create a pending record.
    pub fn new(task_name: impl Into<String>, agent_name: impl Into<String>) -> Self {
        Self {
            task_id: TaskId::generate(),
            task_name: task_name.into(),
            agent_name: agent_name.into(),
            status: TaskStatus::Pending,
            output: None,
            started_at: None,
            finished_at: None,
            error_message: None,
        }
    }

    /// Mark the task as started.
    pub fn start(&mut self) {
        self.status = TaskStatus::Running;
        self.started_at = Some(Utc::now());
    }

    /// Mark the task as completed with its output.
    pub fn complete(&mut self, output: impl Into<String>) {
        self.status = TaskStatus::Completed;
        self.finished_at = Some(Utc::now());
        self.output = Some(output.into());
    }

    /// Mark the task as failed.
    pub fn fail(&mut self, error: impl Into<String>) {
        self.status = TaskStatus::Failed;
        self.finished_at = Some(Utc::now());
        self.error_message = Some(error.into());
    }
}

/// Everything recorded about one kickoff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KickoffLog {
    /// Kickoff identifier.
    pub run_id: RunId,

    /// Inputs the kickoff ran with; replay reuses them.
    pub inputs: RunInputs,

    /// One record per executed task, in execution order.
    pub records: Vec<TaskRecord>,

    /// Where the final task writes its output.
    #[serde(default)]
    pub final_output_file: Option<PathBuf>,

    /// When the kickoff started.
    pub created_at: DateTime<Utc>,
}

impl KickoffLog {
    /// Start a new, empty log.
    pub fn new(inputs: RunInputs) -> Self {
        Self {
            run_id: RunId::generate(),
            inputs,
            records: Vec::new(),
            final_output_file: None,
            created_at: Utc::now(),
        }
    }

    /// Position of a task execution by id.
    pub fn position(&self, task_id: &TaskId) -> Option<usize> {
        self.records.iter().position(|r| r.task_id == *task_id)
    }

    /// Output of the named task, if it completed.
    pub fn output_of(&self, task_name: &str) -> Option<&str> {
        self.records
            .iter()
            .rev()
            .find(|r| r.task_name == task_name && r.status == TaskStatus::Completed)
            .and_then(|r| r.output.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_lifecycle() {
        let mut record = TaskRecord::new("translation", "linguist");
        assert_eq!(record.status, TaskStatus::Pending);
        assert!(!record.status.is_terminal());

        record.start();
        assert_eq!(record.status, TaskStatus::Running);
        assert!(record.started_at.is_some());

        record.complete("Hola mundo");
        assert!(record.status.is_terminal());
        assert_eq!(record.output.as_deref(), Some("Hola mundo"));
        assert!(record.finished_at.is_some());
    }

    #[test]
    fn test_failed_record() {
        let mut record = TaskRecord::new("translation", "linguist");
        record.start();
        record.fail("backend unavailable");
        assert_eq!(record.status, TaskStatus::Failed);
        assert_eq!(record.error_message.as_deref(), Some("backend unavailable"));
        assert!(record.output.is_none());
    }

    #[test]
    fn test_log_lookup() {
        let mut log = KickoffLog::new(RunInputs::new("Hi", "English", "Spanish", 2026));
        let mut analysis = TaskRecord::new("initial_analysis", "coordinator");
        analysis.complete("notes");
        let pending = TaskRecord::new("translation", "linguist");
        let pending_id = pending.task_id.clone();
        log.records.push(analysis);
        log.records.push(pending);

        assert_eq!(log.position(&pending_id), Some(1));
        assert_eq!(log.output_of("initial_analysis"), Some("notes"));
        assert_eq!(log.output_of("translation"), None);
        assert_eq!(log.position(&TaskId::new("nope")), None);
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::Completed).unwrap(),
            r#""COMPLETED""#
        );
    }
}
