//! Prompt assembly for a single step.

use crate::{CoreError, RunInputs, Step};

/// Separator placed between earlier task outputs in a context block.
pub const CONTEXT_DIVIDER: &str = "\n\n----------\n\n";

/// The rendered prompt pair sent to a model backend for one step.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentPrompt {
    /// Persona instructions built from the agent.
    pub system: String,

    /// The task itself, with its context.
    pub user: String,
}

impl AgentPrompt {
    /// Render the prompt for `step`, interpolating run inputs into the agent
    /// and task text. `context` is the already aggregated output of earlier
    /// tasks and is inserted verbatim.
    pub fn for_step(step: &Step, inputs: &RunInputs, context: &str) -> Result<Self, CoreError> {
        let role = inputs.render(&step.agent.role)?;
        let goal = inputs.render(&step.agent.goal)?;
        let backstory = inputs.render(&step.agent.backstory)?;
        let description = inputs.render(&step.task.description)?;
        let expected = inputs.render(&step.task.expected_output)?;

        let mut system = format!(
            "You are {}. {}\nYour personal goal is: {}",
            role, backstory, goal
        );
        for note in &step.agent.guidance {
            system.push_str("\n\n");
            system.push_str(note);
        }

        let mut user = format!(
            "Current Task: {}\n\nThis is the expected criteria for your final answer: {}\n\
             You MUST return the actual complete content as the final answer, not a summary.",
            description, expected
        );
        if !context.trim().is_empty() {
            user.push_str("\n\nThis is the context you're working with:\n");
            user.push_str(context);
        }
        user.push_str("\n\nBegin! This is VERY important to you, give your best Final Answer, your job depends on it!");

        Ok(Self { system, user })
    }
}

/// Join earlier outputs into one context block.
pub fn aggregate_context<'a>(outputs: impl IntoIterator<Item = &'a str>) -> String {
    outputs.into_iter().collect::<Vec<_>>().join(CONTEXT_DIVIDER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AgentSpec, TaskSpec};

    fn step() -> Step {
        Step {
            task: TaskSpec::new("translation", "Translate {source_text} into {target_language}", "linguist")
                .with_expected_output("Only the {target_language} text"),
            agent: AgentSpec::new("linguist", "{source_language} linguist")
                .with_goal("Accurate {topic} translation")
                .with_backstory("Seasoned translator."),
        }
    }

    fn inputs() -> RunInputs {
        RunInputs::new("Hello world", "English", "Spanish", 2026)
    }

    #[test]
    fn test_system_prompt_from_agent() {
        let prompt = AgentPrompt::for_step(&step(), &inputs(), "").unwrap();
        assert_eq!(
            prompt.system,
            "You are English linguist. Seasoned translator.\nYour personal goal is: Accurate General translation"
        );
    }

    #[test]
    fn test_user_prompt_with_context() {
        let prompt = AgentPrompt::for_step(&step(), &inputs(), "analysis notes").unwrap();
        assert!(prompt.user.starts_with("Current Task: Translate Hello world into Spanish"));
        assert!(prompt.user.contains("expected criteria for your final answer: Only the Spanish text"));
        assert!(prompt.user.contains("context you're working with:\nanalysis notes"));
    }

    #[test]
    fn test_user_prompt_without_context() {
        let prompt = AgentPrompt::for_step(&step(), &inputs(), "  ").unwrap();
        assert!(!prompt.user.contains("context you're working with"));
    }

    #[test]
    fn test_guidance_is_not_interpolated() {
        let mut step = step();
        step.agent
            .guidance
            .push("Keep {placeholders} like {topic} untouched.".to_string());
        let prompt = AgentPrompt::for_step(&step, &inputs(), "").unwrap();
        assert!(prompt
            .system
            .ends_with("translation\n\nKeep {placeholders} like {topic} untouched."));
    }

    #[test]
    fn test_missing_variable_surfaces() {
        let mut step = step();
        step.task.description = "Use {glossary}".to_string();
        assert!(matches!(
            AgentPrompt::for_step(&step, &inputs(), ""),
            Err(CoreError::MissingVariable(_))
        ));
    }

    #[test]
    fn test_aggregate_context() {
        assert_eq!(aggregate_context(["a", "b"]), format!("a{}b", CONTEXT_DIVIDER));
        assert_eq!(aggregate_context(Vec::<&str>::new()), "");
    }
}
