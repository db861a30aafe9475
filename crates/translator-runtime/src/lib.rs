//! Execution runtime for the translation crew.
//!
//! A [`Crew`] runs a validated [`translator_core::Pipeline`] one step at a
//! time against an [`AgentBackend`], checkpointing a
//! [`translator_core::KickoffLog`] after every task so a later run can
//! [`Crew::replay`] from any recorded task id.
//!
//! Two backends ship with the crate:
//!
//! - [`ClaudeCodeBackend`] drives the Claude Code CLI through
//!   `translator-claude-sdk`.
//! - [`OpenAiBackend`] talks to any OpenAI-compatible `/chat/completions`
//!   endpoint.

pub mod backend;
pub mod claude;
pub mod crew;
pub mod error;
pub mod openai;
pub mod store;
pub mod training;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use backend::{AgentBackend, CompletionRequest};
pub use claude::ClaudeCodeBackend;
pub use crew::{Crew, CrewOutput};
pub use error::{BackendError, RuntimeError};
pub use openai::{OpenAiBackend, DEFAULT_OPENAI_BASE_URL, DEFAULT_OPENAI_MODEL};
pub use store::{KickoffStore, KICKOFF_FILE};
pub use training::{
    apply_training, load_training_data, save_training_data, FeedbackSource, StdinFeedback,
};
