//! Type definitions for Claude Code stream-json messages.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Top-level message from Claude Code CLI stdout.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClaudeMessage {
    /// System initialization message.
    System {
        #[serde(default)]
        session_id: Option<String>,
        #[serde(default)]
        subtype: Option<String>,
        #[serde(default)]
        model: Option<String>,
    },

    /// Assistant response message.
    Assistant {
        message: AssistantMessage,
        #[serde(default)]
        session_id: Option<String>,
    },

    /// User message (echo).
    User {
        message: UserMessage,
        #[serde(default)]
        session_id: Option<String>,
    },

    /// Execution result.
    Result {
        #[serde(default)]
        subtype: Option<String>,
        #[serde(default, alias = "isError")]
        is_error: Option<bool>,
        #[serde(default, alias = "durationMs")]
        duration_ms: Option<u64>,
        #[serde(default)]
        result: Option<Value>,
        #[serde(default)]
        error: Option<String>,
        #[serde(default, alias = "sessionId")]
        session_id: Option<String>,
    },

    /// Unknown message type (fallback).
    #[serde(untagged)]
    Unknown(Value),
}

impl ClaudeMessage {
    /// Extract session ID from any message type.
    pub fn session_id(&self) -> Option<&str> {
        match self {
            Self::System { session_id, .. } => session_id.as_deref(),
            Self::Assistant { session_id, .. } => session_id.as_deref(),
            Self::User { session_id, .. } => session_id.as_deref(),
            Self::Result { session_id, .. } => session_id.as_deref(),
            Self::Unknown(_) => None,
        }
    }

    /// Short name of the message kind, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::System { .. } => "System",
            Self::Assistant { .. } => "Assistant",
            Self::User { .. } => "User",
            Self::Result { .. } => "Result",
            Self::Unknown(_) => "Unknown",
        }
    }
}

/// Assistant message content.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AssistantMessage {
    #[serde(default)]
    pub id: Option<String>,
    pub role: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub content: Vec<ContentItem>,
    #[serde(default)]
    pub stop_reason: Option<String>,
}

impl AssistantMessage {
    /// Concatenated text blocks of this message.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|item| match item {
                ContentItem::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// User message content.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UserMessage {
    pub role: String,
    #[serde(default)]
    pub content: Vec<ContentItem>,
}

/// Content item in a message.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentItem {
    /// Text content.
    Text { text: String },

    /// Thinking/reasoning content.
    Thinking { thinking: String },

    /// Tool use request.
    ToolUse {
        id: String,
        name: String,
        #[serde(default)]
        input: Value,
    },

    /// Tool result.
    ToolResult {
        tool_use_id: String,
        content: Value,
        #[serde(default)]
        is_error: Option<bool>,
    },

    /// Any other block type.
    #[serde(other)]
    Other,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_message_parsing() {
        let json = r#"{"type":"system","subtype":"init","session_id":"abc123","model":"claude-sonnet-4","cwd":"/tmp","tools":[]}"#;
        let msg: ClaudeMessage = serde_json::from_str(json).unwrap();

        assert!(matches!(msg, ClaudeMessage::System { .. }));
        assert_eq!(msg.session_id(), Some("abc123"));
        assert_eq!(msg.kind(), "System");
    }

    #[test]
    fn test_assistant_message_text() {
        let json = r#"{"type":"assistant","message":{"role":"assistant","content":[{"type":"thinking","thinking":"hmm"},{"type":"text","text":"Hola "},{"type":"text","text":"mundo"}]},"session_id":"s1"}"#;
        let msg: ClaudeMessage = serde_json::from_str(json).unwrap();

        if let ClaudeMessage::Assistant { message, .. } = msg {
            assert_eq!(message.content.len(), 3);
            assert_eq!(message.text(), "Hola mundo");
        } else {
            panic!("Expected assistant message");
        }
    }

    #[test]
    fn test_unknown_content_block() {
        let json = r#"{"type":"assistant","message":{"role":"assistant","content":[{"type":"redacted_thinking","data":"x"}]}}"#;
        let msg: ClaudeMessage = serde_json::from_str(json).unwrap();
        if let ClaudeMessage::Assistant { message, .. } = msg {
            assert!(matches!(message.content[0], ContentItem::Other));
        } else {
            panic!("Expected assistant message");
        }
    }

    #[test]
    fn test_result_message_parsing() {
        let json = r#"{"type":"result","subtype":"success","is_error":false,"duration_ms":1234,"result":"Hola mundo","session_id":"sess-abc"}"#;
        let msg: ClaudeMessage = serde_json::from_str(json).unwrap();

        if let ClaudeMessage::Result {
            is_error,
            duration_ms,
            result,
            session_id,
            ..
        } = msg
        {
            assert_eq!(is_error, Some(false));
            assert_eq!(duration_ms, Some(1234));
            assert_eq!(result.as_ref().and_then(|v| v.as_str()), Some("Hola mundo"));
            assert_eq!(session_id, Some("sess-abc".to_string()));
        } else {
            panic!("Expected result message");
        }
    }

    #[test]
    fn test_unknown_message_type() {
        let json = r#"{"type":"stream_event","event":{"type":"message_stop"}}"#;
        let msg: ClaudeMessage = serde_json::from_str(json).unwrap();
        assert!(matches!(msg, ClaudeMessage::Unknown(_)));
        assert_eq!(msg.session_id(), None);
    }
}
