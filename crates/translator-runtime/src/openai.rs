//! OpenAI-compatible chat completions backend.

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::backend::{AgentBackend, CompletionRequest};
use crate::error::BackendError;

/// Base URL used when none is configured.
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Model used when neither the agent nor the settings name one.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

const TEMPERATURE: f64 = 0.7;

/// Sends each step to `{base_url}/chat/completions`.
pub struct OpenAiBackend {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiBackend {
    /// Create a backend for the given endpoint and key.
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: DEFAULT_OPENAI_MODEL.to_string(),
        }
    }

    /// Builder method to set the default model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[async_trait]
impl AgentBackend for OpenAiBackend {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, BackendError> {
        let model = request.model.as_deref().unwrap_or(&self.model);
        let url = format!("{}/chat/completions", self.base_url);
        info!(agent = %request.agent, task = %request.task, model = %model, "Sending task to chat completions");
        debug!(url = %url, prompt_len = request.prompt.len(), "POST request");

        let payload = build_payload(model, &request.system, &request.prompt, TEMPERATURE);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = error_message(&body);
            warn!(status = status.as_u16(), message = %message, "Chat completion failed");
            return Err(BackendError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: Value = response.json().await?;
        let text = parse_completion(&body)?;
        info!(task = %request.task, output_len = text.len(), "Chat completion received");
        Ok(text)
    }
}

fn build_payload(model: &str, system: &str, prompt: &str, temperature: f64) -> Value {
    json!({
        "model": model,
        "temperature": temperature,
        "messages": [
            {"role": "system", "content": system},
            {"role": "user", "content": prompt},
        ],
    })
}

fn parse_completion(body: &Value) -> Result<String, BackendError> {
    let text = body
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or_default();
    if text.is_empty() {
        return Err(BackendError::EmptyResponse);
    }
    Ok(text.to_string())
}

/// Pull `error.message` out of an error body, falling back to the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .and_then(Value::as_str)
                .map(String::from)
        })
        .unwrap_or_else(|| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_shape() {
        let payload = build_payload("gpt-4o-mini", "You are a linguist.", "Translate.", 0.2);
        assert_eq!(payload["model"], "gpt-4o-mini");
        assert_eq!(payload["temperature"], 0.2);
        assert_eq!(payload["messages"][0]["role"], "system");
        assert_eq!(payload["messages"][0]["content"], "You are a linguist.");
        assert_eq!(payload["messages"][1]["role"], "user");
        assert_eq!(payload["messages"][1]["content"], "Translate.");
    }

    #[test]
    fn test_parse_completion() {
        let body = json!({
            "choices": [{"message": {"role": "assistant", "content": "  Hola mundo\n"}}]
        });
        assert_eq!(parse_completion(&body).unwrap(), "Hola mundo");
    }

    #[test]
    fn test_parse_empty_completion() {
        let blank = json!({"choices": [{"message": {"content": "   "}}]});
        assert!(matches!(parse_completion(&blank), Err(BackendError::EmptyResponse)));

        let no_choices = json!({"choices": []});
        assert!(matches!(parse_completion(&no_choices), Err(BackendError::EmptyResponse)));
    }

    #[test]
    fn test_error_message() {
        let body = r#"{"error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}}"#;
        assert_eq!(error_message(body), "Incorrect API key provided");
        assert_eq!(error_message("Bad Gateway\n"), "Bad Gateway");
    }

    #[test]
    fn test_base_url_is_normalized() {
        let backend = OpenAiBackend::new("http://localhost:8080/v1/", "key").with_model("local");
        assert_eq!(backend.base_url, "http://localhost:8080/v1");
        assert_eq!(backend.model, "local");
        assert_eq!(backend.name(), "openai");
    }
}
