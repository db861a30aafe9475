//! Agent and task rosters loaded from YAML documents.
//!
//! Both documents are mappings keyed by name:
//!
//! ```yaml
//! linguist:
//!   role: Senior {source_language} to {target_language} Linguist
//!   goal: ...
//!   backstory: ...
//! ```
//!
//! Declaration order is preserved.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::{AgentSpec, CoreError, TaskSpec};

#[derive(Debug, Deserialize)]
struct AgentEntry {
    role: String,
    goal: String,
    backstory: String,
    #[serde(default)]
    llm: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TaskEntry {
    description: String,
    expected_output: String,
    agent: String,
    #[serde(default)]
    output_file: Option<PathBuf>,
    #[serde(default)]
    context: Option<Vec<String>>,
}

/// Agents declared in `agents.yaml`.
#[derive(Debug, Clone, Default)]
pub struct AgentRoster {
    agents: Vec<AgentSpec>,
}

impl AgentRoster {
    /// Read and parse an agent roster file.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let text = read_document(path)?;
        Self::from_yaml_str(&text, path)
    }

    /// Parse an agent roster. `origin` is only used in error messages.
    pub fn from_yaml_str(text: &str, origin: &Path) -> Result<Self, CoreError> {
        let agents = parse_entries::<AgentEntry>(text, origin)?
            .into_iter()
            .map(|(name, entry)| {
                require(origin, &name, "role", &entry.role)?;
                require(origin, &name, "goal", &entry.goal)?;
                require(origin, &name, "backstory", &entry.backstory)?;
                Ok(AgentSpec {
                    name,
                    role: entry.role.trim().to_string(),
                    goal: entry.goal.trim().to_string(),
                    backstory: entry.backstory.trim().to_string(),
                    llm: entry.llm.filter(|m| !m.trim().is_empty()),
                    guidance: Vec::new(),
                })
            })
            .collect::<Result<Vec<_>, CoreError>>()?;
        Ok(Self { agents })
    }

    /// Build a roster from already constructed agents.
    pub fn from_agents(agents: Vec<AgentSpec>) -> Self {
        Self { agents }
    }

    /// Look up an agent by name.
    pub fn get(&self, name: &str) -> Option<&AgentSpec> {
        self.agents.iter().find(|a| a.name == name)
    }

    /// All agents in declaration order.
    pub fn agents(&self) -> &[AgentSpec] {
        &self.agents
    }
}

/// Tasks declared in `tasks.yaml`.
#[derive(Debug, Clone, Default)]
pub struct TaskRoster {
    tasks: Vec<TaskSpec>,
}

impl TaskRoster {
    /// Read and parse a task roster file.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let text = read_document(path)?;
        Self::from_yaml_str(&text, path)
    }

    /// Parse a task roster. `origin` is only used in error messages.
    pub fn from_yaml_str(text: &str, origin: &Path) -> Result<Self, CoreError> {
        let tasks = parse_entries::<TaskEntry>(text, origin)?
            .into_iter()
            .map(|(name, entry)| {
                require(origin, &name, "description", &entry.description)?;
                require(origin, &name, "expected_output", &entry.expected_output)?;
                require(origin, &name, "agent", &entry.agent)?;
                Ok(TaskSpec {
                    name,
                    description: entry.description.trim().to_string(),
                    expected_output: entry.expected_output.trim().to_string(),
                    agent: entry.agent.trim().to_string(),
                    output_file: entry.output_file,
                    context: entry.context,
                })
            })
            .collect::<Result<Vec<_>, CoreError>>()?;
        Ok(Self { tasks })
    }

    /// Build a roster from already constructed tasks.
    pub fn from_tasks(tasks: Vec<TaskSpec>) -> Self {
        Self { tasks }
    }

    /// Look up a task by name.
    pub fn get(&self, name: &str) -> Option<&TaskSpec> {
        self.tasks.iter().find(|t| t.name == name)
    }

    /// All tasks in declaration order.
    pub fn tasks(&self) -> &[TaskSpec] {
        &self.tasks
    }
}

fn read_document(path: &Path) -> Result<String, CoreError> {
    std::fs::read_to_string(path).map_err(|source| CoreError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })
}

fn invalid(origin: &Path, message: impl Into<String>) -> CoreError {
    CoreError::InvalidConfig {
        path: origin.to_path_buf(),
        message: message.into(),
    }
}

fn parse_entries<T: DeserializeOwned>(
    text: &str,
    origin: &Path,
) -> Result<Vec<(String, T)>, CoreError> {
    if text.trim().is_empty() {
        return Err(invalid(origin, "document is empty"));
    }

    let mapping: serde_yaml::Mapping =
        serde_yaml::from_str(text).map_err(|e| invalid(origin, e.to_string()))?;

    let mut entries = Vec::with_capacity(mapping.len());
    for (key, value) in mapping {
        let name = key
            .as_str()
            .ok_or_else(|| invalid(origin, format!("entry key {:?} is not a string", key)))?
            .to_string();
        let entry = serde_yaml::from_value::<T>(value)
            .map_err(|e| invalid(origin, format!("entry '{}': {}", name, e)))?;
        entries.push((name, entry));
    }
    Ok(entries)
}

fn require(origin: &Path, name: &str, field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(invalid(origin, format!("entry '{}' has an empty '{}'", name, field)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const AGENTS: &str = r#"
linguist:
  role: Senior {source_language} to {target_language} Linguist
  goal: Produce a faithful translation
  backstory: Twenty years of literary translation.
  llm: claude-sonnet-4-5
editor:
  role: Editor
  goal: Polish the text
  backstory: Former newspaper copy editor.
"#;

    const TASKS: &str = r#"
translation:
  description: Translate {source_text}
  expected_output: The full translation
  agent: linguist
editing:
  description: Edit the translation
  expected_output: Polished text
  agent: editor
  context: [translation]
  output_file: out/edited.txt
"#;

    #[test]
    fn test_agent_roster_preserves_order() {
        let roster = AgentRoster::from_yaml_str(AGENTS, Path::new("agents.yaml")).unwrap();
        let names: Vec<&str> = roster.agents().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["linguist", "editor"]);

        let linguist = roster.get("linguist").unwrap();
        assert_eq!(linguist.llm.as_deref(), Some("claude-sonnet-4-5"));
        assert!(roster.get("editor").unwrap().llm.is_none());
    }

    #[test]
    fn test_task_roster_optional_fields() {
        let roster = TaskRoster::from_yaml_str(TASKS, Path::new("tasks.yaml")).unwrap();
        let editing = roster.get("editing").unwrap();
        assert_eq!(editing.agent, "editor");
        assert_eq!(editing.context, Some(vec!["translation".to_string()]));
        assert_eq!(editing.output_file, Some(PathBuf::from("out/edited.txt")));
        assert!(roster.get("translation").unwrap().context.is_none());
    }

    #[test]
    fn test_missing_field_is_invalid_config() {
        let yaml = "linguist:\n  role: Linguist\n  goal: Translate\n";
        let err = AgentRoster::from_yaml_str(yaml, Path::new("agents.yaml")).unwrap_err();
        match err {
            CoreError::InvalidConfig { message, .. } => assert!(message.contains("linguist")),
            other => panic!("Expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_field_is_invalid_config() {
        let yaml = "translation:\n  description: '  '\n  expected_output: x\n  agent: linguist\n";
        let err = TaskRoster::from_yaml_str(yaml, Path::new("tasks.yaml")).unwrap_err();
        assert!(err.to_string().contains("'description'"));
    }

    #[test]
    fn test_empty_and_malformed_documents() {
        assert!(matches!(
            TaskRoster::from_yaml_str("   \n", Path::new("tasks.yaml")),
            Err(CoreError::InvalidConfig { .. })
        ));
        assert!(matches!(
            TaskRoster::from_yaml_str("- just\n- a list\n", Path::new("tasks.yaml")),
            Err(CoreError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = AgentRoster::load(&dir.path().join("agents.yaml")).unwrap_err();
        assert!(matches!(err, CoreError::ConfigRead { .. }));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.yaml");
        std::fs::write(&path, TASKS).unwrap();
        let roster = TaskRoster::load(&path).unwrap();
        assert_eq!(roster.tasks().len(), 2);
    }
}
