//! Per-run input variables and `{placeholder}` interpolation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Topic used when the caller does not supply one.
pub const DEFAULT_TOPIC: &str = "General";

/// Input variables for one pipeline run.
///
/// Everything the agents may reference is passed here explicitly, including
/// the current year, so the pipeline itself never reads ambient state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunInputs {
    /// Full text of the document being translated.
    pub source_text: String,

    /// Language the document is written in.
    pub source_language: String,

    /// Language to translate into.
    pub target_language: String,

    /// Subject matter of the document.
    pub topic: String,

    /// Year the run happens in, as text.
    pub current_year: String,
}

impl RunInputs {
    /// Create inputs with the default topic.
    pub fn new(
        source_text: impl Into<String>,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
        current_year: i32,
    ) -> Self {
        Self {
            source_text: source_text.into(),
            source_language: source_language.into(),
            target_language: target_language.into(),
            topic: DEFAULT_TOPIC.to_string(),
            current_year: current_year.to_string(),
        }
    }

    /// Builder method to set the topic.
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = topic.into();
        self
    }

    /// All template variables by name.
    pub fn variables(&self) -> BTreeMap<String, String> {
        let mut vars = BTreeMap::new();
        vars.insert("source_text".to_string(), self.source_text.clone());
        vars.insert("source_language".to_string(), self.source_language.clone());
        vars.insert("target_language".to_string(), self.target_language.clone());
        vars.insert("topic".to_string(), self.topic.clone());
        vars.insert("current_year".to_string(), self.current_year.clone());
        vars
    }

    /// Interpolate a template against these inputs.
    pub fn render(&self, template: &str) -> Result<String, CoreError> {
        interpolate(template, &self.variables())
    }
}

/// Replace `{name}` placeholders with values from `vars`.
///
/// Only braces around an identifier (`[A-Za-z_][A-Za-z0-9_]*`) are
/// placeholders; any other brace is copied through, so JSON snippets in task
/// descriptions survive. Substituted values are not scanned again.
pub fn interpolate(template: &str, vars: &BTreeMap<String, String>) -> Result<String, CoreError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        match placeholder_name(after) {
            Some(name) => {
                let value = vars
                    .get(name)
                    .ok_or_else(|| CoreError::MissingVariable(name.to_string()))?;
                out.push_str(value);
                rest = &after[name.len() + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    Ok(out)
}

fn placeholder_name(after_brace: &str) -> Option<&str> {
    let close = after_brace.find('}')?;
    let name = &after_brace[..close];
    let mut chars = name.chars();
    let first = chars.next()?;
    if !(first.is_ascii_alphabetic() || first == '_') {
        return None;
    }
    if chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Some(name)
    } else {
        None
    }
}
