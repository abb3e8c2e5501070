//! Chat-completion client abstraction
//!
//! The summarizer talks to the language model only through [`LLMClient`],
//! so any OpenAI-compatible backend (or a test double) can be plugged in.
//! Implementations perform exactly one request per call; retrying is the
//! orchestrator's job.

use crate::types::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// A single message of a chat conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Generic LLM client trait for provider abstraction
///
/// Errors are reported as `ModelUnavailable` (transport, auth, non-success
/// status), `ModelTimeout` (deadline exceeded) or `MalformedOutput`
/// (a response without usable content).
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Generate with a system prompt and a single user prompt
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        self.generate_with_history(&[ChatMessage::system(system), ChatMessage::user(prompt)])
            .await
    }

    /// Generate from a full conversation
    async fn generate_with_history(&self, messages: &[ChatMessage]) -> Result<String>;

    /// Get the model name/identifier
    fn model_name(&self) -> &str;
}
