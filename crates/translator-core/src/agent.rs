//! Agent persona types.

use serde::{Deserialize, Serialize};

/// A configuration-driven agent persona.
///
/// Agents carry no logic of their own: the role, goal and backstory are
/// rendered into the system prompt of every task the agent is assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSpec {
    /// Roster key (e.g. "linguist").
    pub name: String,

    /// Short role title.
    pub role: String,

    /// What the agent is trying to achieve.
    pub goal: String,

    /// Background that shapes the agent's voice.
    pub backstory: String,

    /// Model override for this agent; the backend default is used otherwise.
    pub llm: Option<String>,

    /// Reviewer notes from training, added to the persona verbatim.
    #[serde(default)]
    pub guidance: Vec<String>,
}

impl AgentSpec {
    /// Create a new AgentSpec with minimal required fields.
    pub fn new(name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
            goal: String::new(),
            backstory: String::new(),
            llm: None,
            guidance: Vec::new(),
        }
    }

    /// Builder method to set the goal.
    pub fn with_goal(mut self, goal: impl Into<String>) -> Self {
        self.goal = goal.into();
        self
    }

    /// Builder method to set the backstory.
    pub fn with_backstory(mut self, backstory: impl Into<String>) -> Self {
        self.backstory = backstory.into();
        self
    }

    /// Builder method to set a model override.
    pub fn with_llm(mut self, llm: impl Into<String>) -> Self {
        self.llm = Some(llm.into());
        self
    }
}
