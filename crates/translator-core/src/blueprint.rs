//! The fixed shape of the translation crew.
//!
//! The rosters say *how* each agent and task behaves; the blueprint says
//! *which* of them make up the crew and in what order the tasks run.

use std::path::PathBuf;

/// File the final assembly task writes unless the caller overrides it.
pub const FINAL_OUTPUT_FILE: &str = "translated_document.txt";

/// A task slot in the blueprint.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskBinding {
    /// Task roster key.
    pub name: String,

    /// Output file fixed by the blueprint; takes precedence over the roster.
    pub output_file: Option<PathBuf>,
}

impl TaskBinding {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            output_file: None,
        }
    }
}

/// Required agents and the ordered task slots of a crew.
#[derive(Debug, Clone, PartialEq)]
pub struct Blueprint {
    /// Agent roster keys the crew needs.
    pub agents: Vec<String>,

    /// Task slots in execution order.
    pub tasks: Vec<TaskBinding>,
}

impl Blueprint {
    /// The seven-step document translation crew.
    pub fn translation() -> Self {
        let agents = [
            "coordinator",
            "linguist",
            "context_expert",
            "editor",
            "technical_specialist",
            "cultural_consultant",
        ]
        .iter()
        .map(|a| a.to_string())
        .collect();

        let mut tasks: Vec<TaskBinding> = [
            "initial_analysis",
            "context_preparation",
            "translation",
            "technical_review",
            "editing",
            "cultural_adaptation",
            "final_assembly",
        ]
        .iter()
        .map(|t| TaskBinding::new(t))
        .collect();

        if let Some(last) = tasks.last_mut() {
            last.output_file = Some(PathBuf::from(FINAL_OUTPUT_FILE));
        }

        Self { agents, tasks }
    }

    /// Names of the task slots, in execution order.
    pub fn task_names(&self) -> Vec<&str> {
        self.tasks.iter().map(|t| t.name.as_str()).collect()
    }
}
