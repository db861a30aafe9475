//! Command implementations.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{Datelike, Local};
use tracing::{error, info};
use translator_core::{KickoffLog, PipelineBuilder, RunInputs, TaskId};
use translator_runtime::{
    apply_training, load_training_data, AgentBackend, Crew, CrewOutput, FeedbackSource,
    KickoffStore, RuntimeError,
};

use crate::cli::{BatchArgs, TrainArgs, TranslateArgs};
use crate::config::Settings;
use crate::error::CliError;

/// Source text used for every training iteration.
pub const TRAINING_SAMPLE_TEXT: &str = "This is a sample text for training purposes.";

/// Topic used for training runs.
pub const TRAINING_TOPIC: &str = "Training";

/// Outcome of a batch run.
#[derive(Debug, Default, PartialEq)]
pub struct BatchSummary {
    pub translated: Vec<PathBuf>,
    pub failed: Vec<String>,
}

/// Runs commands against one backend.
pub struct App {
    settings: Settings,
    backend: Arc<dyn AgentBackend>,
}

impl App {
    pub fn new(settings: Settings, backend: Arc<dyn AgentBackend>) -> Self {
        Self { settings, backend }
    }

    /// Build a fresh crew from the configuration directory.
    fn crew(&self) -> Result<Crew, RuntimeError> {
        let mut pipeline = PipelineBuilder::from_config_dir(&self.settings.config_dir)?.build()?;

        if let Some(path) = &self.settings.trained_data {
            match load_training_data(path)? {
                Some(data) => apply_training(&mut pipeline, &data),
                None => info!(path = %path.display(), "No trained data found, running untrained"),
            }
        }

        Ok(Crew::new(pipeline, self.backend.clone())
            .with_store(KickoffStore::new(&self.settings.state_dir))
            .with_working_dir(&self.settings.working_dir))
    }

    fn inputs(&self, source_text: String, source_language: &str, target_language: &str) -> RunInputs {
        RunInputs::new(source_text, source_language, target_language, Local::now().year())
    }

    /// Translate one file and return the path the translation was saved to.
    pub async fn translate(&self, args: &TranslateArgs) -> Result<PathBuf, CliError> {
        if !args.input_file.is_file() {
            return Err(CliError::InputFileNotFound(args.input_file.clone()));
        }
        let source_text = read_source(&args.input_file)?;

        let output_file = match &args.output_file {
            Some(path) => path.clone(),
            None => self.settings.working_dir.join(timestamped_output_name(
                &args.input_file,
                &args.target_language,
                Local::now().format("%Y%m%d_%H%M%S").to_string().as_str(),
            )),
        };

        println!(
            "Starting translation from {} to {}...",
            args.source_language, args.target_language
        );
        println!("File: {}", args.input_file.display());
        println!("Topic: {}", args.topic);

        let inputs = self
            .inputs(source_text, &args.source_language, &args.target_language)
            .with_topic(&args.topic);
        let output = self
            .run(inputs)
            .await
            .map_err(CliError::Translation)?;

        write_result(&output_file, &output.raw).map_err(CliError::Translation)?;
        println!("\nTranslation complete! Saved to: {}", output_file.display());
        Ok(output_file)
    }

    /// Translate every matching file in a directory, continuing past failures.
    pub async fn batch(&self, args: &BatchArgs) -> Result<BatchSummary, CliError> {
        if !args.input_dir.is_dir() {
            return Err(CliError::InputDirNotFound(args.input_dir.clone()));
        }
        fs::create_dir_all(&args.output_dir).map_err(|source| CliError::WriteOutput {
            path: args.output_dir.clone(),
            source,
        })?;

        let files = matching_files(&args.input_dir, &args.file_ext)?;
        let mut summary = BatchSummary::default();
        if files.is_empty() {
            println!("No {} files found in {}", args.file_ext, args.input_dir.display());
            return Ok(summary);
        }

        println!(
            "Found {} files to translate from {} to {}",
            files.len(),
            args.source_language,
            args.target_language
        );

        for (i, path) in files.iter().enumerate() {
            let name = file_name(path);
            println!("\nTranslating file {}/{}: {}", i + 1, files.len(), name);

            let output_path = args
                .output_dir
                .join(format!("{}_{}.txt", file_stem(path), args.target_language));
            match self.translate_one(path, &output_path, args).await {
                Ok(()) => {
                    println!("Saved translation to: {}", output_path.display());
                    summary.translated.push(output_path);
                }
                Err(e) => {
                    error!(file = %name, error = %e, "Batch item failed");
                    println!("Error translating {}: {}", name, e);
                    summary.failed.push(name);
                }
            }
        }

        println!("\nBatch translation complete!");
        Ok(summary)
    }

    async fn translate_one(
        &self,
        input: &Path,
        output: &Path,
        args: &BatchArgs,
    ) -> Result<(), CliError> {
        let source_text = read_source(input)?;
        let inputs = self
            .inputs(source_text, &args.source_language, &args.target_language)
            .with_topic(&args.topic);
        let result = self.run(inputs).await.map_err(CliError::Translation)?;
        write_result(output, &result.raw).map_err(CliError::Translation)
    }

    /// Run the training loop against the fixed sample sentence.
    pub async fn train(
        &self,
        args: &TrainArgs,
        feedback: &mut dyn FeedbackSource,
    ) -> Result<(), CliError> {
        let inputs = self
            .inputs(
                TRAINING_SAMPLE_TEXT.to_string(),
                &args.source_language,
                &args.target_language,
            )
            .with_topic(TRAINING_TOPIC);

        let crew = self.crew().map_err(CliError::Training)?;
        crew.train(args.iterations, &args.filename, inputs, feedback)
            .await
            .map_err(CliError::Training)?;

        println!(
            "Training complete. {} iteration(s) saved to {}",
            args.iterations,
            args.filename.display()
        );
        Ok(())
    }

    /// Re-run the last kickoff from `task_id`.
    pub async fn replay(&self, task_id: &str) -> Result<CrewOutput, CliError> {
        let crew = self.crew().map_err(CliError::Replay)?;
        let output = crew
            .replay(&TaskId::new(task_id))
            .await
            .map_err(CliError::Replay)?;
        println!("{}", output.raw);
        Ok(output)
    }

    /// Print the task ids recorded by the last kickoff.
    pub fn log_tasks_outputs(&self) -> Result<KickoffLog, CliError> {
        let log = KickoffStore::new(&self.settings.state_dir)
            .load()
            .map_err(CliError::Replay)?;

        println!("Tasks of kickoff {} ({}):", log.run_id, log.created_at.format("%Y-%m-%d %H:%M:%S"));
        println!("{:<36}  {:<10}  {:<20}  {}", "TASK ID", "STATUS", "TASK", "AGENT");
        println!("{}", "-".repeat(90));
        for record in &log.records {
            println!(
                "{:<36}  {:<10}  {:<20}  {}",
                record.task_id,
                format!("{:?}", record.status),
                record.task_name,
                record.agent_name
            );
        }
        Ok(log)
    }

    async fn run(&self, inputs: RunInputs) -> Result<CrewOutput, RuntimeError> {
        self.crew()?.kickoff(inputs).await
    }
}

fn read_source(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::ReadSource {
        path: path.to_path_buf(),
        source,
    })
}

fn write_result(path: &Path, text: &str) -> Result<(), RuntimeError> {
    fs::write(path, text).map_err(|source| RuntimeError::OutputWrite {
        path: path.to_path_buf(),
        source,
    })
}

/// Regular files in `dir` whose names end with `ext`, sorted by name.
fn matching_files(dir: &Path, ext: &str) -> Result<Vec<PathBuf>, CliError> {
    let entries = fs::read_dir(dir).map_err(|source| CliError::ReadSource {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && file_name(path).ends_with(ext))
        .collect();
    files.sort();
    Ok(files)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// `{stem}_{target_language}_{timestamp}.txt`
fn timestamped_output_name(input: &Path, target_language: &str, timestamp: &str) -> String {
    format!("{}_{}_{}.txt", file_stem(input), target_language, timestamp)
}
