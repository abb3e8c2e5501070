//! Research Cycle Orchestration
//!
//! A research cycle is one search → summarize → respond execution for a
//! single query:
//!
//! - [`orchestrator::ResearchOrchestrator`] - validates the query, runs both
//!   phases and shapes the terminal error
//! - [`retry::RetryPolicy`] - exponential backoff with jitter, applied per phase
//!
//! # Usage
//!
//! ```ignore
//! use research_agent::research::{OrchestratorSettings, ResearchOrchestrator};
//!
//! let orchestrator = ResearchOrchestrator::new(search, summarizer, OrchestratorSettings::default());
//! let answer = orchestrator.run("latest developments in quantum computing").await?;
//!
//! println!("{}", answer.summary);
//! for citation in answer.citations {
//!     println!("- {}", citation.url);
//! }
//! ```
//!
//! # Phases
//!
//! `Idle → Searching → Summarizing → Done`, with `Failed` reachable from
//! either working phase. A phase that keeps failing after its retries ends
//! the cycle with `ResearchUnavailable`; the summarizer is never called after
//! a failed search.

/// Research cycle execution.
pub mod orchestrator;
/// Retry and backoff policy.
pub mod retry;

pub use orchestrator::{OrchestratorSettings, ResearchOrchestrator};
pub use retry::RetryPolicy;
