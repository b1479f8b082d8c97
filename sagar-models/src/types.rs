//! Chat request and reply types.

use serde::{Deserialize, Serialize};

/// Role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A message in a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
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

/// A conversation to answer, oldest message first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<Message>,
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

impl ChatRequest {
    pub fn new(messages: Vec<Message>, session_id: impl Into<String>) -> Self {
        Self {
            messages,
            session_id: session_id.into(),
        }
    }

    /// The most recent user message, if any.
    pub fn last_user_message(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
    }
}

/// An answer and where it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantReply {
    pub content: String,
    /// 0.0 to 1.0. Offline replies carry 0.
    pub confidence: f64,
    pub provenance: String,
}

impl AssistantReply {
    pub fn new(content: impl Into<String>, confidence: f64, provenance: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            confidence,
            provenance: provenance.into(),
        }
    }
}
