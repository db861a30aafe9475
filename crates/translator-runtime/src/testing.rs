//! Scripted collaborators for tests.

use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use translator_core::{AgentRoster, AgentSpec, Blueprint, TaskRoster, TaskSpec};

use crate::backend::{AgentBackend, CompletionRequest};
use crate::error::{BackendError, RuntimeError};
use crate::training::FeedbackSource;

/// Answers every task with `"<task> output"` and records each request.
#[derive(Default)]
pub struct ScriptedBackend {
    calls: Mutex<Vec<CompletionRequest>>,
    failing: HashSet<String>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every call for the named task.
    pub fn failing_on(mut self, task: impl Into<String>) -> Self {
        self.failing.insert(task.into());
        self
    }

    /// Requests received so far.
    pub fn calls(&self) -> Vec<CompletionRequest> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Task names received so far, in call order.
    pub fn tasks_called(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.task).collect()
    }
}

#[async_trait]
impl AgentBackend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, BackendError> {
        let task = request.task.clone();
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request);
        if self.failing.contains(&task) {
            return Err(BackendError::Api {
                status: 500,
                message: format!("scripted failure in {}", task),
            });
        }
        Ok(format!("{} output", task))
    }
}

/// Replays canned feedback lines, then answers with empty feedback.
#[derive(Default)]
pub struct ScriptedFeedback {
    answers: VecDeque<String>,
    pub asked: Vec<String>,
}

impl ScriptedFeedback {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
        }
    }
}

#[async_trait]
impl FeedbackSource for ScriptedFeedback {
    async fn feedback(
        &mut self,
        task_name: &str,
        _agent_name: &str,
        _output: &str,
    ) -> Result<String, RuntimeError> {
        self.asked.push(task_name.to_string());
        Ok(self.answers.pop_front().unwrap_or_default())
    }
}

/// Agent roster covering the translation crew.
pub fn crew_agents() -> AgentRoster {
    let agents = Blueprint::translation()
        .agents
        .iter()
        .map(|name| {
            AgentSpec::new(name.clone(), format!("{} for {{target_language}}", name))
                .with_goal(format!("{} goal", name))
                .with_backstory(format!("{} backstory", name))
        })
        .collect();
    AgentRoster::from_agents(agents)
}

/// Task roster covering the translation crew, each task referencing the
/// source text.
pub fn crew_tasks() -> TaskRoster {
    let assignments = [
        ("initial_analysis", "coordinator"),
        ("context_preparation", "context_expert"),
        ("translation", "linguist"),
        ("technical_review", "technical_specialist"),
        ("editing", "editor"),
        ("cultural_adaptation", "cultural_consultant"),
        ("final_assembly", "coordinator"),
    ];
    let tasks = assignments
        .iter()
        .map(|(task, agent)| {
            TaskSpec::new(
                *task,
                format!("{} of '{{source_text}}' from {{source_language}}", task),
                *agent,
            )
            .with_expected_output(format!("{} result", task))
        })
        .collect();
    TaskRoster::from_tasks(tasks)
}
