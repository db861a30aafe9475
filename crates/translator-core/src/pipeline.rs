//! Pipeline construction: binding the task roster to the agent roster.

use std::path::{Path, PathBuf};

use crate::{AgentRoster, AgentSpec, Blueprint, CoreError, TaskRoster, TaskSpec, FINAL_OUTPUT_FILE};

/// File name of the agent roster inside a configuration directory.
pub const AGENTS_FILE: &str = "agents.yaml";

/// File name of the task roster inside a configuration directory.
pub const TASKS_FILE: &str = "tasks.yaml";

/// A task bound to the agent that performs it.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub task: TaskSpec,
    pub agent: AgentSpec,
}

/// An ordered, validated execution plan.
///
/// Steps run strictly in order; the last step always has an output file.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipeline {
    steps: Vec<Step>,
}

impl Pipeline {
    /// Steps in execution order.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns true if the pipeline has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Index of the step running the named task.
    pub fn position(&self, task_name: &str) -> Option<usize> {
        self.steps.iter().position(|s| s.task.name == task_name)
    }

    /// Task names in execution order.
    pub fn task_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.task.name.as_str()).collect()
    }

    /// Where the final step writes its output.
    pub fn final_output_file(&self) -> Option<&Path> {
        self.steps.last().and_then(|s| s.task.output_file.as_deref())
    }

    /// Override where the final step writes its output.
    pub fn set_final_output_file(&mut self, path: impl Into<PathBuf>) {
        if let Some(last) = self.steps.last_mut() {
            last.task.output_file = Some(path.into());
        }
    }

    /// Attach guidance to the named agent wherever it appears.
    ///
    /// Guidance is not a template; braces in it reach the model unchanged.
    pub fn add_agent_guidance(&mut self, agent_name: &str, guidance: &str) {
        for step in self.steps.iter_mut().filter(|s| s.agent.name == agent_name) {
            step.agent.guidance.push(guidance.to_string());
        }
    }
}

/// Builds a [`Pipeline`] from a blueprint and the two rosters.
#[derive(Debug, Clone)]
pub struct PipelineBuilder {
    blueprint: Blueprint,
    agents: AgentRoster,
    tasks: TaskRoster,
}

impl PipelineBuilder {
    /// Create a builder for the translation crew.
    pub fn new(agents: AgentRoster, tasks: TaskRoster) -> Self {
        Self {
            blueprint: Blueprint::translation(),
            agents,
            tasks,
        }
    }

    /// Load `agents.yaml` and `tasks.yaml` from a configuration directory.
    pub fn from_config_dir(dir: &Path) -> Result<Self, CoreError> {
        let agents = AgentRoster::load(&dir.join(AGENTS_FILE))?;
        let tasks = TaskRoster::load(&dir.join(TASKS_FILE))?;
        Ok(Self::new(agents, tasks))
    }

    /// Builder method to use a different blueprint.
    pub fn with_blueprint(mut self, blueprint: Blueprint) -> Self {
        self.blueprint = blueprint;
        self
    }

    /// Validate everything and produce the execution plan.
    pub fn build(&self) -> Result<Pipeline, CoreError> {
        for name in &self.blueprint.agents {
            if self.agents.get(name).is_none() {
                return Err(CoreError::MissingAgent(name.clone()));
            }
        }

        let mut steps: Vec<Step> = Vec::with_capacity(self.blueprint.tasks.len());
        for binding in &self.blueprint.tasks {
            let mut task = self
                .tasks
                .get(&binding.name)
                .cloned()
                .ok_or_else(|| CoreError::MissingTask(binding.name.clone()))?;

            let in_crew = self.blueprint.agents.iter().any(|a| *a == task.agent);
            let agent = self
                .agents
                .get(&task.agent)
                .filter(|_| in_crew)
                .cloned()
                .ok_or_else(|| CoreError::UnknownAgent {
                    task: task.name.clone(),
                    agent: task.agent.clone(),
                })?;

            if let Some(context) = &task.context {
                for dep in context {
                    if !steps.iter().any(|s| s.task.name == *dep) {
                        return Err(CoreError::InvalidContext {
                            task: task.name.clone(),
                            context: dep.clone(),
                        });
                    }
                }
            }

            if let Some(path) = &binding.output_file {
                task.output_file = Some(path.clone());
            }

            steps.push(Step { task, agent });
        }

        if let Some(last) = steps.last_mut() {
            if last.task.output_file.is_none() {
                last.task.output_file = Some(PathBuf::from(FINAL_OUTPUT_FILE));
            }
        }

        Ok(Pipeline { steps })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::TaskBinding;

    pub(crate) fn crew_agents() -> AgentRoster {
        let agents = Blueprint::translation()
            .agents
            .iter()
            .map(|name| {
                AgentSpec::new(name.clone(), format!("{} role", name))
                    .with_goal(format!("{} goal", name))
                    .with_backstory(format!("{} backstory", name))
            })
            .collect();
        AgentRoster::from_agents(agents)
    }

    pub(crate) fn crew_tasks() -> TaskRoster {
        let assignments = [
            ("initial_analysis", "coordinator"),
            ("context_preparation", "context_expert"),
            ("translation", "linguist"),
            ("technical_review", "technical_specialist"),
            ("editing", "editor"),
            ("cultural_adaptation", "cultural_consultant"),
            ("final_assembly", "coordinator"),
        ];
        // Declared in reverse to show the blueprint, not the document, sets the order.
        let tasks = assignments
            .iter()
            .rev()
            .map(|(task, agent)| {
                TaskSpec::new(*task, format!("Do {}", task), *agent)
                    .with_expected_output(format!("{} result", task))
            })
            .collect();
        TaskRoster::from_tasks(tasks)
    }

    #[test]
    fn test_build_follows_blueprint_order() {
        let pipeline = PipelineBuilder::new(crew_agents(), crew_tasks()).build().unwrap();
        assert_eq!(pipeline.len(), 7);
        assert_eq!(pipeline.task_names(), Blueprint::translation().task_names());

        let analysis = pipeline.position("initial_analysis").unwrap();
        let translation = pipeline.position("translation").unwrap();
        let assembly = pipeline.position("final_assembly").unwrap();
        assert!(analysis < translation && translation < assembly);
        assert_eq!(pipeline.steps()[2].agent.name, "linguist");
    }

    #[test]
    fn test_final_step_writes_translated_document() {
        let mut pipeline = PipelineBuilder::new(crew_agents(), crew_tasks()).build().unwrap();
        let last = pipeline.steps().last().unwrap();
        assert_eq!(last.task.output_file, Some(PathBuf::from(FINAL_OUTPUT_FILE)));

        pipeline.set_final_output_file("custom.txt");
        assert_eq!(pipeline.final_output_file(), Some(Path::new("custom.txt")));
    }

    #[test]
    fn test_missing_agent() {
        let agents: Vec<AgentSpec> = crew_agents()
            .agents()
            .iter()
            .filter(|a| a.name != "editor")
            .cloned()
            .collect();
        let err = PipelineBuilder::new(AgentRoster::from_agents(agents), crew_tasks())
            .build()
            .unwrap_err();
        assert!(matches!(err, CoreError::MissingAgent(ref n) if n == "editor"));
    }

    #[test]
    fn test_missing_task() {
        let tasks: Vec<TaskSpec> = crew_tasks()
            .tasks()
            .iter()
            .filter(|t| t.name != "technical_review")
            .cloned()
            .collect();
        let err = PipelineBuilder::new(crew_agents(), TaskRoster::from_tasks(tasks))
            .build()
            .unwrap_err();
        assert!(matches!(err, CoreError::MissingTask(ref n) if n == "technical_review"));
    }

    #[test]
    fn test_task_with_unknown_agent() {
        let mut tasks = crew_tasks().tasks().to_vec();
        tasks[0].agent = "proofreader".to_string();
        let err = PipelineBuilder::new(crew_agents(), TaskRoster::from_tasks(tasks))
            .build()
            .unwrap_err();
        assert!(matches!(err, CoreError::UnknownAgent { ref agent, .. } if agent == "proofreader"));
    }

    #[test]
    fn test_agent_outside_crew_is_unknown() {
        let mut agents = crew_agents().agents().to_vec();
        agents.push(AgentSpec::new("intern", "Intern"));
        let mut tasks = crew_tasks().tasks().to_vec();
        tasks[0].agent = "intern".to_string();
        let err = PipelineBuilder::new(AgentRoster::from_agents(agents), TaskRoster::from_tasks(tasks))
            .build()
            .unwrap_err();
        assert!(matches!(err, CoreError::UnknownAgent { .. }));
    }

    #[test]
    fn test_context_must_reference_earlier_task() {
        let tasks: Vec<TaskSpec> = crew_tasks()
            .tasks()
            .iter()
            .cloned()
            .map(|t| {
                if t.name == "translation" {
                    t.with_context(vec!["editing".to_string()])
                } else {
                    t
                }
            })
            .collect();
        let err = PipelineBuilder::new(crew_agents(), TaskRoster::from_tasks(tasks))
            .build()
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidContext { ref context, .. } if context == "editing"));
    }

    #[test]
    fn test_custom_blueprint_still_persists_final_output() {
        let blueprint = Blueprint {
            agents: vec!["linguist".to_string()],
            tasks: vec![TaskBinding {
                name: "translation".to_string(),
                output_file: None,
            }],
        };
        let pipeline = PipelineBuilder::new(crew_agents(), crew_tasks())
            .with_blueprint(blueprint)
            .build()
            .unwrap();
        assert_eq!(pipeline.len(), 1);
        assert_eq!(
            pipeline.steps()[0].task.output_file,
            Some(PathBuf::from(FINAL_OUTPUT_FILE))
        );
    }

    #[test]
    fn test_agent_guidance() {
        let mut pipeline = PipelineBuilder::new(crew_agents(), crew_tasks()).build().unwrap();
        pipeline.add_agent_guidance("coordinator", "Keep headings.");
        let coordinator_steps: Vec<&Step> = pipeline
            .steps()
            .iter()
            .filter(|s| s.agent.name == "coordinator")
            .collect();
        assert_eq!(coordinator_steps.len(), 2);
        assert!(coordinator_steps
            .iter()
            .all(|s| s.agent.guidance == vec!["Keep headings.".to_string()]));
        assert!(coordinator_steps
            .iter()
            .all(|s| s.agent.backstory == "coordinator backstory"));
    }

    #[test]
    fn test_shipped_config_builds() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config");
        let pipeline = PipelineBuilder::from_config_dir(&dir).unwrap().build().unwrap();
        assert_eq!(pipeline.task_names(), Blueprint::translation().task_names());

        let inputs = crate::RunInputs::new("Hello", "English", "Spanish", 2026);
        for step in pipeline.steps() {
            crate::AgentPrompt::for_step(step, &inputs, "").unwrap();
        }
    }

    #[test]
    fn test_from_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let err = PipelineBuilder::from_config_dir(dir.path()).unwrap_err();
        assert!(matches!(err, CoreError::ConfigRead { .. }));
    }
}
