//! CLI errors.

use std::path::PathBuf;

use thiserror::Error;
use translator_runtime::RuntimeError;

/// Errors reported to the user by the `translator` binary.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Input file not found: {}", .0.display())]
    InputFileNotFound(PathBuf),

    #[error("Input directory not found: {}", .0.display())]
    InputDirNotFound(PathBuf),

    #[error("Error reading source file {}: {source}", .path.display())]
    ReadSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("An error occurred during translation: {0}")]
    Translation(#[source] RuntimeError),

    #[error("An error occurred while training the translation crew: {0}")]
    Training(#[source] RuntimeError),

    #[error("An error occurred while replaying the translation crew: {0}")]
    Replay(#[source] RuntimeError),

    /// Settings are unusable, e.g. a backend without credentials.
    #[error("{0}")]
    Setup(String),
}
