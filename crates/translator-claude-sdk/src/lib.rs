//! Claude Code SDK for the translation crew
//!
//! This crate runs the Claude Code CLI as a one-shot subprocess
//! (`claude --print --output-format=stream-json`), feeds it a prompt on
//! stdin, and folds the streamed JSON messages into a single text answer.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use translator_claude_sdk::{ClaudeExecutor, TracingHandler};
//!
//! async fn ask() -> Result<(), Box<dyn std::error::Error>> {
//!     let executor = ClaudeExecutor::new("claude")
//!         .with_system_prompt("You are a careful translator.");
//!
//!     let result = executor
//!         .execute(Path::new("."), "Translate 'Hello world' into Spanish.", &TracingHandler)
//!         .await?;
//!
//!     println!("{}", result.text);
//!     Ok(())
//! }
//! ```

mod error;
mod executor;
mod handler;
mod transcript;
mod types;

// Re-export main types
pub use error::SdkError;
pub use executor::{ClaudeExecutor, ExecutionResult};
pub use handler::{MessageHandler, TracingHandler};
pub use transcript::Transcript;
pub use types::{AssistantMessage, ClaudeMessage, ContentItem, UserMessage};
