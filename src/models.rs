use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Speaker of a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        })
    }
}

/// A single chat turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Chat request: the whole conversation so far, newest user turn last.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub data: Vec<ChatMessage>,
}

/// Successful chat response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub message: String,
}

/// Failed chat response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// A review entry returned by the vector index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalMatch {
    pub id: String,
    #[serde(default)]
    pub score: Option<f32>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

const MISSING_FIELD: &str = "unknown";

impl RetrievalMatch {
    /// Professor name from metadata, falling back to the match id.
    pub fn professor(&self) -> String {
        self.metadata
            .get("professor")
            .and_then(display_value)
            .unwrap_or_else(|| self.id.clone())
    }

    pub fn subject(&self) -> String {
        self.field("subject")
    }

    pub fn stars(&self) -> String {
        self.field("stars")
    }

    fn field(&self, key: &str) -> String {
        self.metadata
            .get(key)
            .and_then(display_value)
            .unwrap_or_else(|| MISSING_FIELD.to_string())
    }
}

/// Render a scalar metadata value the way it was stored.
fn display_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
