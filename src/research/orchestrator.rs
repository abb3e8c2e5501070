use crate::research::retry::{exhausted, RetryPolicy};
use crate::search::{clamp_max_results, SearchClient};
use crate::summarizer::SummarizerClient;
use crate::types::{ResearchAnswer, ResearchError, ResearchPhase, ResearchQuery, Result};
use crate::utils::toml_config::ResearchConfig;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Tunables of a research cycle.
#[derive(Debug, Clone)]
pub struct OrchestratorSettings {
    /// Results requested from the search provider (clamped to 1..=20)
    pub max_results: usize,
    pub retry: RetryPolicy,
    /// Deadline for the whole cycle, retries and backoff included
    pub overall_budget: Option<Duration>,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            max_results: 10,
            retry: RetryPolicy::default(),
            overall_budget: None,
        }
    }
}

impl From<&ResearchConfig> for OrchestratorSettings {
    fn from(config: &ResearchConfig) -> Self {
        Self {
            max_results: config.search.max_results,
            retry: config.retry.policy(),
            overall_budget: config.research.overall_budget(),
        }
    }
}

/// Phase of the running cycle, readable after the cycle future is dropped.
struct PhaseTracker(Mutex<ResearchPhase>);

impl PhaseTracker {
    fn new() -> Self {
        Self(Mutex::new(ResearchPhase::Idle))
    }

    fn enter(&self, next: ResearchPhase) {
        let mut phase = self.0.lock();
        debug!(from = %*phase, to = %next, "Research phase transition");
        *phase = next;
    }

    fn current(&self) -> ResearchPhase {
        *self.0.lock()
    }
}

/// Runs search then summarize for one query, with bounded retries.
///
/// Holds no per-request state, so one instance is shared by all handlers.
pub struct ResearchOrchestrator {
    search: Arc<dyn SearchClient>,
    summarizer: Arc<dyn SummarizerClient>,
    settings: OrchestratorSettings,
}

impl ResearchOrchestrator {
    pub fn new(
        search: Arc<dyn SearchClient>,
        summarizer: Arc<dyn SummarizerClient>,
        mut settings: OrchestratorSettings,
    ) -> Self {
        settings.max_results = clamp_max_results(settings.max_results);
        Self {
            search,
            summarizer,
            settings,
        }
    }

    pub fn settings(&self) -> &OrchestratorSettings {
        &self.settings
    }

    /// Execute one research cycle.
    ///
    /// # Errors
    ///
    /// - `InvalidQuery` when `raw` is blank; nothing is called
    /// - `ResearchUnavailable` when a phase exhausts its retries or the
    ///   overall budget runs out; the error names the phase
    pub async fn run(&self, raw: &str) -> Result<ResearchAnswer> {
        let query = ResearchQuery::parse(raw)?;
        let started = Instant::now();
        let tracker = PhaseTracker::new();

        info!(query = query.as_str(), "Research cycle started");

        let outcome = match self.settings.overall_budget {
            Some(budget) => tokio::time::timeout(budget, self.cycle(&query, &tracker))
                .await
                .unwrap_or_else(|_| {
                    Err(ResearchError::ResearchUnavailable {
                        phase: tracker.current(),
                        reason: format!("overall budget of {} ms exceeded", budget.as_millis()),
                    })
                }),
            None => self.cycle(&query, &tracker).await,
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &outcome {
            Ok(answer) => {
                tracker.enter(ResearchPhase::Done);
                info!(
                    elapsed_ms,
                    citations = answer.citations.len(),
                    "Research cycle completed"
                );
            }
            Err(e) => {
                tracker.enter(ResearchPhase::Failed);
                warn!(elapsed_ms, kind = e.kind(), error = %e, "Research cycle failed");
            }
        }

        outcome
    }

    async fn cycle(&self, query: &ResearchQuery, tracker: &PhaseTracker) -> Result<ResearchAnswer> {
        let retry = &self.settings.retry;

        tracker.enter(ResearchPhase::Searching);
        let results = retry
            .run("search", || {
                self.search.search(query, self.settings.max_results)
            })
            .await
            .map_err(|e| exhausted(ResearchPhase::Searching, e))?;
        debug!(
            provider = self.search.name(),
            count = results.len(),
            "Search finished"
        );

        tracker.enter(ResearchPhase::Summarizing);
        retry
            .run("summarize", || self.summarizer.summarize(query, &results))
            .await
            .map_err(|e| exhausted(ResearchPhase::Summarizing, e))
    }
}
