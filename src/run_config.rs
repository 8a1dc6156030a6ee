use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::models::ChatMessage;

pub const DEFAULT_MODEL: &str = "databricks-dbrx-instruct";
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";
pub const DEFAULT_USER_PROMPT: &str = "What is a mixture of experts model?";
pub const DEFAULT_MAX_TOKENS: u32 = 256;

/// Settings for one CLI run, optionally loaded from a JSON file.
///
/// Every field is optional in the file; missing ones take the defaults above.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RunConfig {
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    #[serde(default = "default_user_prompt")]
    pub user_prompt: String,

    /// `null` in the file leaves the output length to the endpoint.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: Option<u32>,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

fn default_user_prompt() -> String {
    DEFAULT_USER_PROMPT.to_string()
}

fn default_max_tokens() -> Option<u32> {
    Some(DEFAULT_MAX_TOKENS)
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            system_prompt: default_system_prompt(),
            user_prompt: default_user_prompt(),
            max_tokens: default_max_tokens(),
        }
    }
}

impl RunConfig {
    /// Load a run configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).with_context(|| {
            format!(
                "Failed to read run config file: {}",
                path.as_ref().display()
            )
        })?;

        let config: RunConfig = serde_json::from_str(&content)
            .with_context(|| "Failed to parse run config JSON")?;

        Ok(config)
    }

    /// Conversation sent for this run: the system prompt (if any) then the user prompt.
    pub fn messages(&self) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(2);
        if !self.system_prompt.trim().is_empty() {
            messages.push(ChatMessage::system(self.system_prompt.clone()));
        }
        messages.push(ChatMessage::user(self.user_prompt.clone()));
        messages
    }
}
