//! Language Model Clients
//!
//! [`LLMClient`] is the chat-completion capability the summarizer depends on.
//! [`OpenAIClient`] implements it against any OpenAI-compatible endpoint
//! (OpenAI itself, Azure, OpenRouter, DashScope compatible mode, vLLM, ...).
//!
//! # Example
//!
//! ```ignore
//! use research_agent::llm::{LLMClient, OpenAIClient};
//!
//! let client = OpenAIClient::new(api_key, "https://api.openai.com/v1".into(), "gpt-4o-mini".into())?;
//! let reply = client.generate_with_system("Answer briefly.", "What is 2+2?").await?;
//! ```

/// Core LLM client trait and chat message types.
pub mod client;
/// OpenAI-compatible chat completions over HTTP.
pub mod openai;

pub use client::{ChatMessage, ChatRole, LLMClient};
pub use openai::OpenAIClient;
