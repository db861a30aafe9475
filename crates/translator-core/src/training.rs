//! Human feedback collected while training the crew.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One reviewed task output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSample {
    pub task_name: String,
    pub agent_name: String,
    pub output: String,
    /// What the reviewer said; empty when they had nothing to add.
    pub feedback: String,
}

/// All samples of one training iteration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingIteration {
    /// Zero-based iteration number.
    pub iteration: u32,
    pub samples: Vec<TrainingSample>,
    pub recorded_at: DateTime<Utc>,
}

/// Contents of a training data file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingData {
    pub iterations: Vec<TrainingIteration>,
}

impl TrainingData {
    /// Append an iteration.
    pub fn push(&mut self, iteration: u32, samples: Vec<TrainingSample>) {
        self.iterations.push(TrainingIteration {
            iteration,
            samples,
            recorded_at: Utc::now(),
        });
    }

    /// Agents that received at least one piece of feedback, in first-seen order.
    pub fn agents_with_feedback(&self) -> Vec<&str> {
        let mut agents: Vec<&str> = Vec::new();
        for sample in self.samples().filter(|s| !s.feedback.trim().is_empty()) {
            if !agents.contains(&sample.agent_name.as_str()) {
                agents.push(&sample.agent_name);
            }
        }
        agents
    }

    /// Feedback for one agent rendered as backstory guidance.
    pub fn guidance_for(&self, agent_name: &str) -> Option<String> {
        let notes: Vec<&str> = self
            .samples()
            .filter(|s| s.agent_name == agent_name)
            .map(|s| s.feedback.trim())
            .filter(|f| !f.is_empty())
            .collect();
        if notes.is_empty() {
            return None;
        }

        let mut guidance = String::from("Guidance from previous training sessions:");
        for note in notes {
            guidance.push_str("\n- ");
            guidance.push_str(note);
        }
        Some(guidance)
    }

    fn samples(&self) -> impl Iterator<Item = &TrainingSample> {
        self.iterations.iter().flat_map(|i| i.samples.iter())
    }
}
