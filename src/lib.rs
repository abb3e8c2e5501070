//! # Research Agent
//!
//! An Agent-to-Agent (A2A) research service: a query comes in, the web is
//! searched, a language model summarizes the results, and the answer goes
//! back with the sources it cites.
//!
//! ## Overview
//!
//! The research agent can be used in two ways:
//!
//! 1. **As a standalone server** - Run the `research-agent` binary
//! 2. **As a library** - Embed the orchestration core in your own service
//!
//! ### Basic Example
//!
//! ```rust,ignore
//! use research_agent::{
//!     DuckDuckGoClient, LlmSummarizer, OpenAIClient, OrchestratorSettings, ResearchOrchestrator,
//! };
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let search = Arc::new(DuckDuckGoClient::new(
//!     "https://html.duckduckgo.com",
//!     Duration::from_secs(10),
//!     "research-agent",
//! )?);
//! let llm = Arc::new(OpenAIClient::new(api_key, "https://api.openai.com/v1".into(), "gpt-4o-mini".into())?);
//! let summarizer = Arc::new(LlmSummarizer::new(llm));
//!
//! let orchestrator = ResearchOrchestrator::new(search, summarizer, OrchestratorSettings::default());
//! let answer = orchestrator.run("renewable energy trends").await?;
//! println!("{}", answer.to_text());
//! ```
//!
//! ## Modules
//!
//! - [`a2a`] - A2A JSON-RPC protocol adapter and task record
//! - [`api`] - HTTP handlers and routes
//! - [`llm`] - Chat-completion clients
//! - [`research`] - Research cycle orchestration and retry policy
//! - [`search`] - Web search providers
//! - [`summarizer`] - Cited summaries from search results
//! - [`types`] - Domain types and error handling
//! - [`utils`] - Configuration and logging
//!
//! ## Configuration
//!
//! Settings come from `research.toml` (or the file named by
//! `RESEARCH_CONFIG`); see [`utils::toml_config`]. The LLM API key is read
//! from the environment variable named by `[llm].api_key_env`.

#![warn(rustdoc::missing_crate_level_docs)]

/// A2A protocol adapter.
pub mod a2a;
/// HTTP API handlers and routes.
pub mod api;
/// LLM provider clients and abstractions.
pub mod llm;
/// Research cycle orchestration.
pub mod research;
/// Web search providers.
pub mod search;
/// Summarization of search results.
pub mod summarizer;
/// Core types (requests, responses, errors).
pub mod types;
/// Configuration and logging utilities.
pub mod utils;

// Re-export commonly used types
pub use a2a::{AgentCard, ResearchTaskManager};
pub use llm::{LLMClient, OpenAIClient};
pub use research::{OrchestratorSettings, ResearchOrchestrator, RetryPolicy};
pub use search::{DuckDuckGoClient, SearchClient};
pub use summarizer::{LlmSummarizer, SummarizerClient};
pub use types::{ResearchAnswer, ResearchError, Result};
pub use utils::toml_config::{ConfigError, ResearchConfig};

use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration
    pub config: Arc<ResearchConfig>,
    /// Research pipeline shared by the REST and A2A endpoints
    pub orchestrator: Arc<ResearchOrchestrator>,
    /// A2A request handling and task record
    pub tasks: Arc<ResearchTaskManager>,
    /// Card served at `/.well-known/agent.json`
    pub agent_card: Arc<AgentCard>,
}

impl AppState {
    /// Assemble the state around an existing orchestrator.
    pub fn new(config: ResearchConfig, orchestrator: Arc<ResearchOrchestrator>) -> Self {
        let tasks = Arc::new(ResearchTaskManager::new(
            orchestrator.clone(),
            config.a2a.task_capacity,
        ));
        let agent_card = Arc::new(AgentCard::research_agent(config.server.public_url()));

        Self {
            config: Arc::new(config),
            orchestrator,
            tasks,
            agent_card,
        }
    }

    /// Build the DuckDuckGo + OpenAI-compatible pipeline described by `config`.
    pub fn from_config(config: ResearchConfig, api_key: String) -> Result<Self> {
        let search = Arc::new(DuckDuckGoClient::new(
            &config.search.base_url,
            config.search.timeout(),
            &config.search.user_agent,
        )?);

        let llm = Arc::new(
            OpenAIClient::new(
                api_key,
                config.llm.api_base.clone(),
                config.llm.model.clone(),
            )?
            .with_temperature(config.llm.temperature)
            .with_timeout(config.llm.timeout()),
        );
        let summarizer = Arc::new(LlmSummarizer::new(llm));

        let orchestrator = Arc::new(ResearchOrchestrator::new(
            search,
            summarizer,
            OrchestratorSettings::from(&config),
        ));

        Ok(Self::new(config, orchestrator))
    }
}
