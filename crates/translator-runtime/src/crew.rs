//! Sequential execution of a pipeline.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{error, info, warn};
use translator_core::{
    aggregate_context, AgentPrompt, KickoffLog, Pipeline, RunId, RunInputs, Step, TaskId,
    TaskRecord, TaskStatus, TrainingData, TrainingSample,
};

use crate::backend::{AgentBackend, CompletionRequest};
use crate::error::RuntimeError;
use crate::store::KickoffStore;
use crate::training::{save_training_data, FeedbackSource};

/// Result of a successful kickoff.
#[derive(Debug, Clone)]
pub struct CrewOutput {
    /// Output of the final task.
    pub raw: String,

    /// Kickoff identifier.
    pub run_id: RunId,

    /// Every task record of the kickoff, in execution order.
    pub tasks: Vec<TaskRecord>,
}

/// Collects reviewer feedback while a training iteration runs.
struct Review<'a> {
    source: &'a mut dyn FeedbackSource,
    samples: Vec<TrainingSample>,
}

/// Runs a pipeline one step at a time against a model backend.
pub struct Crew {
    pipeline: Pipeline,
    backend: Arc<dyn AgentBackend>,
    store: Option<KickoffStore>,
    working_dir: PathBuf,
}

impl Crew {
    /// Create a crew without a checkpoint store.
    pub fn new(pipeline: Pipeline, backend: Arc<dyn AgentBackend>) -> Self {
        Self {
            pipeline,
            backend,
            store: None,
            working_dir: PathBuf::from("."),
        }
    }

    /// Builder method to checkpoint every kickoff into `store`.
    pub fn with_store(mut self, store: KickoffStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Builder method to resolve relative task output files against `dir`.
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = dir.into();
        self
    }

    /// Run every task in order with `inputs`.
    pub async fn kickoff(&self, inputs: RunInputs) -> Result<CrewOutput, RuntimeError> {
        let log = self.new_log(inputs);
        info!(
            run_id = %log.run_id,
            backend = %self.backend.name(),
            tasks = self.pipeline.len(),
            "Starting kickoff"
        );
        self.execute(log, 0, None).await
    }

    /// Re-run the last recorded kickoff starting at `task_id`.
    ///
    /// Tasks before it keep their recorded outputs; the stored inputs are
    /// reused.
    pub async fn replay(&self, task_id: &TaskId) -> Result<CrewOutput, RuntimeError> {
        let store = self.store.as_ref().ok_or(RuntimeError::NoCheckpointStore)?;
        let previous = store.load()?;

        let index = previous
            .position(task_id)
            .ok_or_else(|| RuntimeError::UnknownTaskId(task_id.to_string()))?;
        let task_name = &previous.records[index].task_name;
        let start = self
            .pipeline
            .position(task_name)
            .ok_or_else(|| RuntimeError::StaleTask(task_name.clone()))?;

        let mut log = self.new_log(previous.inputs.clone());
        for step in &self.pipeline.steps()[..start] {
            let record = previous
                .records
                .iter()
                .rev()
                .find(|r| r.task_name == step.task.name && r.status == TaskStatus::Completed)
                .ok_or_else(|| RuntimeError::MissingOutput(step.task.name.clone()))?;
            log.records.push(record.clone());
        }

        info!(
            run_id = %log.run_id,
            replayed_from = %previous.run_id,
            task = %task_name,
            "Replaying kickoff"
        );
        self.execute(log, start, None).await
    }

    /// Run the crew `iterations` times, asking for feedback after every task.
    ///
    /// The training file at `path` is rewritten after each iteration.
    pub async fn train(
        &self,
        iterations: u32,
        path: &Path,
        inputs: RunInputs,
        feedback: &mut dyn FeedbackSource,
    ) -> Result<TrainingData, RuntimeError> {
        let mut data = TrainingData::default();
        for iteration in 0..iterations {
            info!(iteration, total = iterations, "Starting training iteration");
            let mut review = Review {
                source: &mut *feedback,
                samples: Vec::new(),
            };
            let log = self.new_log(inputs.clone());
            self.execute(log, 0, Some(&mut review)).await?;

            data.push(iteration, review.samples);
            save_training_data(path, &data)?;
        }
        info!(iterations, path = %path.display(), "Training complete");
        Ok(data)
    }

    fn new_log(&self, inputs: RunInputs) -> KickoffLog {
        let mut log = KickoffLog::new(inputs);
        log.final_output_file = self.pipeline.final_output_file().map(Path::to_path_buf);
        log
    }

    async fn execute(
        &self,
        mut log: KickoffLog,
        start: usize,
        mut review: Option<&mut Review<'_>>,
    ) -> Result<CrewOutput, RuntimeError> {
        let steps = &self.pipeline.steps()[start..];
        if steps.is_empty() {
            return Err(RuntimeError::EmptyPipeline);
        }

        // Template errors surface before the first model call.
        for step in steps {
            AgentPrompt::for_step(step, &log.inputs, "")?;
        }

        let mut raw = String::new();
        for step in steps {
            let context = context_for(step, &log);
            let prompt = AgentPrompt::for_step(step, &log.inputs, &context)?;
            let request = CompletionRequest {
                agent: step.agent.name.clone(),
                task: step.task.name.clone(),
                system: prompt.system,
                prompt: prompt.user,
                model: step.agent.llm.clone(),
            };

            let mut record = TaskRecord::new(&step.task.name, &step.agent.name);
            record.start();
            info!(task = %step.task.name, agent = %step.agent.name, task_id = %record.task_id, "Running task");

            let output = match self.backend.complete(request).await {
                Ok(output) => output,
                Err(e) => {
                    error!(task = %step.task.name, error = %e, "Task failed, aborting kickoff");
                    record.fail(e.to_string());
                    log.records.push(record);
                    self.checkpoint(&log);
                    return Err(RuntimeError::Task {
                        task: step.task.name.clone(),
                        source: e,
                    });
                }
            };

            record.complete(output.clone());
            log.records.push(record);
            self.checkpoint(&log);

            if let Some(path) = &step.task.output_file {
                self.write_output(path, &output)?;
            }

            if let Some(review) = review.as_mut() {
                let feedback = review
                    .source
                    .feedback(&step.task.name, &step.agent.name, &output)
                    .await?;
                review.samples.push(TrainingSample {
                    task_name: step.task.name.clone(),
                    agent_name: step.agent.name.clone(),
                    output: output.clone(),
                    feedback,
                });
            }

            info!(task = %step.task.name, output_len = output.len(), "Task completed");
            raw = output;
        }

        info!(run_id = %log.run_id, "Kickoff completed");
        Ok(CrewOutput {
            raw,
            run_id: log.run_id,
            tasks: log.records,
        })
    }

    fn checkpoint(&self, log: &KickoffLog) {
        if let Some(store) = &self.store {
            if let Err(e) = store.save(log) {
                warn!(error = %e, "Failed to checkpoint kickoff");
            }
        }
    }

    fn write_output(&self, path: &Path, output: &str) -> Result<(), RuntimeError> {
        let path = self.working_dir.join(path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| RuntimeError::OutputWrite {
                path: path.clone(),
                source,
            })?;
        }
        fs::write(&path, output).map_err(|source| RuntimeError::OutputWrite {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), "Task output written");
        Ok(())
    }
}

/// Outputs of the named context tasks, or of every earlier task.
fn context_for(step: &Step, log: &KickoffLog) -> String {
    match &step.task.context {
        Some(names) => aggregate_context(names.iter().filter_map(|name| log.output_of(name))),
        None => aggregate_context(
            log.records
                .iter()
                .filter(|r| r.status == TaskStatus::Completed)
                .filter_map(|r| r.output.as_deref()),
        ),
    }
}
