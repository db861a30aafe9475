//! Command line definition.
//!
//! Flags keep their snake_case spelling (`--input_file`) with a kebab-case
//! alias (`--input-file`).

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use translator_core::DEFAULT_TOPIC;
use translator_runtime::DEFAULT_OPENAI_BASE_URL;

use crate::config::{BackendKind, Settings};

/// Multi-agent document translation crew.
#[derive(Parser, Debug)]
#[command(name = "translator", version)]
#[command(about = "Translate documents with a crew of specialised agents", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every command.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Directory holding agents.yaml and tasks.yaml
    #[arg(long, global = true, env = "TRANSLATOR_CONFIG_DIR", default_value = "config")]
    pub config_dir: PathBuf,

    /// Directory for the kickoff checkpoint used by replay
    #[arg(long, global = true, env = "TRANSLATOR_STATE_DIR", default_value = ".translator")]
    pub state_dir: PathBuf,

    /// Model backend answering the agents
    #[arg(long, global = true, env = "TRANSLATOR_BACKEND", value_enum, default_value_t = BackendKind::Claude)]
    pub backend: BackendKind,

    /// Default model for agents without an `llm` entry
    #[arg(long, global = true, env = "TRANSLATOR_MODEL")]
    pub model: Option<String>,

    /// Path to the claude CLI binary
    #[arg(long, global = true, env = "CLAUDE_PATH", default_value = "claude")]
    pub claude_path: String,

    /// Base URL of the OpenAI-compatible API
    #[arg(long, global = true, env = "OPENAI_BASE_URL", default_value = DEFAULT_OPENAI_BASE_URL)]
    pub openai_base_url: String,

    /// API key for the OpenAI-compatible API
    #[arg(long, global = true, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// Training file whose feedback is applied to the agents
    #[arg(long, global = true, env = "TRANSLATOR_TRAINED_DATA")]
    pub trained_data: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl From<GlobalArgs> for Settings {
    fn from(args: GlobalArgs) -> Self {
        Self {
            config_dir: args.config_dir,
            state_dir: args.state_dir,
            backend: args.backend,
            model: args.model,
            claude_path: args.claude_path,
            openai_base_url: args.openai_base_url,
            openai_api_key: args.openai_api_key,
            trained_data: args.trained_data,
            ..Settings::default()
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Translate a single file
    Translate(TranslateArgs),

    /// Translate every matching file in a directory
    Batch(BatchArgs),

    /// Train the translation crew with human feedback
    Train(TrainArgs),

    /// Replay the last kickoff from a specific task
    Replay {
        /// ID of the task to replay from
        task_id: String,
    },

    /// List the task ids of the last kickoff
    #[command(name = "log-tasks-outputs")]
    LogTasksOutputs,
}

#[derive(Args, Debug, Clone)]
pub struct TranslateArgs {
    /// Path to the file to translate
    #[arg(long = "input_file", visible_alias = "input-file")]
    pub input_file: PathBuf,

    /// Source language of the file
    #[arg(long = "source_language", visible_alias = "source-language")]
    pub source_language: String,

    /// Target language for translation
    #[arg(long = "target_language", visible_alias = "target-language")]
    pub target_language: String,

    /// Subject matter of the text
    #[arg(long, default_value = DEFAULT_TOPIC)]
    pub topic: String,

    /// Path to save the translated file (default: auto-generated name)
    #[arg(long = "output_file", visible_alias = "output-file")]
    pub output_file: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct BatchArgs {
    /// Directory containing files to translate
    #[arg(long = "input_dir", visible_alias = "input-dir")]
    pub input_dir: PathBuf,

    /// Directory to save translated files
    #[arg(long = "output_dir", visible_alias = "output-dir")]
    pub output_dir: PathBuf,

    /// Source language of all files
    #[arg(long = "source_language", visible_alias = "source-language")]
    pub source_language: String,

    /// Target language for translation
    #[arg(long = "target_language", visible_alias = "target-language")]
    pub target_language: String,

    /// File extension to process
    #[arg(long = "file_ext", visible_alias = "file-ext", default_value = ".txt")]
    pub file_ext: String,

    /// Subject matter of the texts
    #[arg(long, default_value = DEFAULT_TOPIC)]
    pub topic: String,
}

#[derive(Args, Debug, Clone)]
pub struct TrainArgs {
    /// Number of training iterations
    pub iterations: u32,

    /// File to save training data to
    pub filename: PathBuf,

    /// Source language
    #[arg(long = "source_language", visible_alias = "source-language", default_value = "English")]
    pub source_language: String,

    /// Target language
    #[arg(long = "target_language", visible_alias = "target-language", default_value = "Spanish")]
    pub target_language: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_translate_snake_and_kebab_flags() {
        let cli = Cli::try_parse_from([
            "translator",
            "translate",
            "--input_file",
            "doc.txt",
            "--source-language",
            "English",
            "--target_language",
            "French",
        ])
        .unwrap();
        match cli.command {
            Command::Translate(args) => {
                assert_eq!(args.input_file, PathBuf::from("doc.txt"));
                assert_eq!(args.source_language, "English");
                assert_eq!(args.target_language, "French");
                assert_eq!(args.topic, DEFAULT_TOPIC);
                assert!(args.output_file.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_batch_defaults() {
        let cli = Cli::try_parse_from([
            "translator",
            "batch",
            "--input_dir",
            "in",
            "--output_dir",
            "out",
            "--source_language",
            "English",
            "--target_language",
            "German",
        ])
        .unwrap();
        match cli.command {
            Command::Batch(args) => {
                assert_eq!(args.file_ext, ".txt");
                assert_eq!(args.topic, DEFAULT_TOPIC);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_train_positionals_and_defaults() {
        let cli = Cli::try_parse_from(["translator", "train", "3", "training.json"]).unwrap();
        match cli.command {
            Command::Train(args) => {
                assert_eq!(args.iterations, 3);
                assert_eq!(args.filename, PathBuf::from("training.json"));
                assert_eq!(args.source_language, "English");
                assert_eq!(args.target_language, "Spanish");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "translator",
            "replay",
            "abc-123",
            "--backend",
            "openai",
            "--config-dir",
            "crew",
        ])
        .unwrap();
        assert_eq!(cli.global.backend, BackendKind::Openai);
        assert_eq!(cli.global.config_dir, PathBuf::from("crew"));
        assert!(matches!(cli.command, Command::Replay { ref task_id } if task_id == "abc-123"));
    }

    #[test]
    fn test_missing_command_is_an_error() {
        assert!(Cli::try_parse_from(["translator"]).is_err());
        assert!(Cli::try_parse_from(["translator", "summarize"]).is_err());
        assert!(Cli::try_parse_from(["translator", "translate", "--source_language", "English"]).is_err());
    }
}
