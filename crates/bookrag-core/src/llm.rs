//! LLM capability traits and message types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

/// Role of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single role-tagged chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
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
}

/// Configuration for a chat completion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionConfig {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Maps text to a fixed-length vector
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a single text with the given model
    async fn embed(&self, model: &str, text: &str) -> Result<Vec<f32>>;
}

/// Maps a list of role-tagged messages to generated text
#[async_trait]
pub trait ChatCompleter: Send + Sync {
    /// Run a chat completion and return the generated text
    async fn complete(&self, messages: &[ChatMessage], config: &CompletionConfig) -> Result<String>;
}
