//! Web Search Providers
//!
//! This module defines the [`SearchClient`] capability used by the research
//! pipeline and its concrete providers.
//!
//! # Contract
//!
//! - `max_results` is clamped to [`MIN_RESULTS`]..=[`MAX_RESULTS`], never rejected
//! - results keep the provider's ranking order
//! - an empty result list is a valid answer, not an error
//! - transport failures map to `ProviderUnavailable`, deadlines to
//!   `ProviderTimeout`; both are retryable by the orchestrator
//!
//! # Providers
//!
//! - [`duckduckgo::DuckDuckGoClient`] - DuckDuckGo HTML endpoint

/// DuckDuckGo HTML search provider.
pub mod duckduckgo;

use crate::types::{ResearchQuery, Result, SearchResult};
use async_trait::async_trait;

pub use duckduckgo::DuckDuckGoClient;

/// Smallest accepted `max_results`.
pub const MIN_RESULTS: usize = 1;
/// Largest accepted `max_results`.
pub const MAX_RESULTS: usize = 20;

/// Clamp a requested result count into the supported range.
pub fn clamp_max_results(requested: usize) -> usize {
    requested.clamp(MIN_RESULTS, MAX_RESULTS)
}

/// A single-shot web search against an external provider.
#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Search for `query`, returning at most `max_results` ranked results.
    async fn search(&self, query: &ResearchQuery, max_results: usize) -> Result<Vec<SearchResult>>;

    /// Provider identifier used in logs
    fn name(&self) -> &str;
}
