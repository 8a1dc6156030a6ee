use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::collections::HashMap;

use crate::error::ClientError;

/// Chat Completions role enumeration.
///
/// Uses lowercase serialization to match the Chat Completions wire format:
/// "system" | "user" | "assistant"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A single role-tagged message.
///
/// Messages carry no identity beyond their position in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Chat Completions request body.
///
/// Built fresh for every call. `max_tokens` is left out of the JSON entirely
/// when unset so the endpoint applies its own default.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

impl CompletionRequest {
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>, max_tokens: Option<u32>) -> Self {
        Self {
            model: model.into(),
            messages,
            max_tokens,
        }
    }

    /// Reject requests the endpoint would refuse anyway, before anything is sent.
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.model.trim().is_empty() {
            return Err(ClientError::invalid_request("model identifier must not be empty"));
        }
        if self.messages.is_empty() {
            return Err(ClientError::invalid_request("messages must not be empty"));
        }
        if let Some(index) = self.messages.iter().position(|m| m.content.trim().is_empty()) {
            return Err(ClientError::invalid_request(format!(
                "message {index} ({}) has empty content",
                self.messages[index].role.as_str()
            )));
        }
        if self.max_tokens == Some(0) {
            return Err(ClientError::invalid_request("max_tokens must be positive"));
        }
        Ok(())
    }
}

// ============================================================================
// Chat Completions Response Models
// ============================================================================

/// Message in a Chat Completions response
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponseMessage {
    pub role: String, // "assistant"
    #[serde(default)]
    pub content: Option<String>,
}

/// Choice in a Chat Completions response
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatChoice {
    pub index: u32,
    pub message: ChatResponseMessage,
    #[serde(default)]
    pub finish_reason: Option<String>, // "stop", "length", "content_filter"
}

/// Usage statistics in a Chat Completions response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

/// Typed view of an OpenAI-shaped Chat Completions response.
///
/// Serving endpoints add their own fields; those are kept in `extra`.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    pub id: String,
    #[serde(default)]
    pub object: Option<String>, // "chat.completion"
    #[serde(default)]
    pub created: Option<u64>,
    pub model: String,
    pub choices: Vec<ChatChoice>,
    #[serde(default)]
    pub usage: Option<ChatUsage>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}
