//! Translation Crew Core Domain Types
//!
//! This crate contains the pure domain of the translation crew with no
//! dependencies on:
//! - Model backends or subprocesses
//! - Async runtimes
//! - The command line
//!
//! It knows how to load the agent and task rosters, bind them into an ordered
//! [`Pipeline`], interpolate run inputs, and assemble prompts. Executing the
//! pipeline is the job of `translator-runtime`.

pub mod agent;
pub mod blueprint;
pub mod error;
pub mod ids;
pub mod inputs;
pub mod pipeline;
pub mod prompt;
pub mod record;
pub mod roster;
pub mod task;
pub mod training;

// Re-export commonly used types
pub use agent::AgentSpec;
pub use blueprint::{Blueprint, TaskBinding, FINAL_OUTPUT_FILE};
pub use error::CoreError;
pub use ids::{RunId, TaskId};
pub use inputs::{interpolate, RunInputs, DEFAULT_TOPIC};
pub use pipeline::{Pipeline, PipelineBuilder, Step, AGENTS_FILE, TASKS_FILE};
pub use prompt::{aggregate_context, AgentPrompt, CONTEXT_DIVIDER};
pub use record::{KickoffLog, TaskRecord, TaskStatus};
pub use roster::{AgentRoster, TaskRoster};
pub use task::TaskSpec;
pub use training::{TrainingData, TrainingIteration, TrainingSample};
