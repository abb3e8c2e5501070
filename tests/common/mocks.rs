//! Mock implementations for testing.
//!
//! Scripted search, summarizer and LLM clients shared across the
//! integration tests. Each mock counts its calls so tests can assert on
//! retries and on collaborators that must not be invoked.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use research_agent::llm::{ChatMessage, LLMClient};
use research_agent::search::SearchClient;
use research_agent::summarizer::SummarizerClient;
use research_agent::types::{
    Citation, ResearchAnswer, ResearchError, ResearchQuery, Result, SearchResult,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Replays scripted outcomes in order, then repeats the fallback forever.
struct Script<T: Clone> {
    queue: Mutex<VecDeque<Result<T>>>,
    fallback: Result<T>,
}

impl<T: Clone> Script<T> {
    fn new(script: Vec<Result<T>>, fallback: Result<T>) -> Self {
        Self {
            queue: Mutex::new(script.into()),
            fallback,
        }
    }

    fn next(&self) -> Result<T> {
        self.queue
            .lock()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

// ============= Search =============

/// Mock search provider with scripted responses.
pub struct MockSearchClient {
    script: Script<Vec<SearchResult>>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    requested: Mutex<Vec<usize>>,
}

impl MockSearchClient {
    /// Always return `results`.
    pub fn returning(results: Vec<SearchResult>) -> Self {
        Self::scripted(vec![], Ok(results))
    }

    /// Always fail with `err`.
    pub fn failing(err: ResearchError) -> Self {
        Self::scripted(vec![], Err(err))
    }

    /// Play `script` first, then `fallback` on every later call.
    pub fn scripted(script: Vec<Result<Vec<SearchResult>>>, fallback: Result<Vec<SearchResult>>) -> Self {
        Self {
            script: Script::new(script, fallback),
            delay: None,
            calls: AtomicUsize::new(0),
            requested: Mutex::new(Vec::new()),
        }
    }

    /// Sleep before answering each call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// `max_results` values received, in call order.
    pub fn requested(&self) -> Vec<usize> {
        self.requested.lock().clone()
    }
}

#[async_trait]
impl SearchClient for MockSearchClient {
    async fn search(&self, _query: &ResearchQuery, max_results: usize) -> Result<Vec<SearchResult>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requested.lock().push(max_results);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.script.next()
    }

    fn name(&self) -> &str {
        "mock-search"
    }
}

// ============= Summarizer =============

/// Mock summarizer with scripted answers.
pub struct MockSummarizer {
    script: Script<ResearchAnswer>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    seen: Mutex<Vec<Vec<SearchResult>>>,
}

impl MockSummarizer {
    pub fn returning(answer: ResearchAnswer) -> Self {
        Self::scripted(vec![], Ok(answer))
    }

    pub fn failing(err: ResearchError) -> Self {
        Self::scripted(vec![], Err(err))
    }

    pub fn scripted(script: Vec<Result<ResearchAnswer>>, fallback: Result<ResearchAnswer>) -> Self {
        Self {
            script: Script::new(script, fallback),
            delay: None,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Result sets passed in, in call order.
    pub fn seen(&self) -> Vec<Vec<SearchResult>> {
        self.seen.lock().clone()
    }
}

#[async_trait]
impl SummarizerClient for MockSummarizer {
    async fn summarize(
        &self,
        _query: &ResearchQuery,
        results: &[SearchResult],
    ) -> Result<ResearchAnswer> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().push(results.to_vec());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.script.next()
    }

    fn name(&self) -> &str {
        "mock-summarizer"
    }
}

// ============= LLM =============

/// Mock chat model with scripted replies that records every conversation.
pub struct MockLLMClient {
    script: Script<String>,
    calls: AtomicUsize,
    conversations: Mutex<Vec<Vec<ChatMessage>>>,
}

impl MockLLMClient {
    /// Always reply with `response`.
    pub fn new(response: &str) -> Self {
        Self::scripted(vec![], Ok(response.to_string()))
    }

    /// Always fail with `err`.
    pub fn failing(err: ResearchError) -> Self {
        Self::scripted(vec![], Err(err))
    }

    pub fn scripted(script: Vec<Result<String>>, fallback: Result<String>) -> Self {
        Self {
            script: Script::new(script, fallback),
            calls: AtomicUsize::new(0),
            conversations: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn conversations(&self) -> Vec<Vec<ChatMessage>> {
        self.conversations.lock().clone()
    }
}

#[async_trait]
impl LLMClient for MockLLMClient {
    async fn generate_with_history(&self, messages: &[ChatMessage]) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.conversations.lock().push(messages.to_vec());
        self.script.next()
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

// ============= Fixtures =============

/// `n` distinct search results on example.com.
pub fn sample_results(n: usize) -> Vec<SearchResult> {
    (1..=n)
        .map(|i| SearchResult {
            title: format!("Result {}", i),
            url: format!("https://example.com/article-{}", i),
            snippet: format!("Snippet number {}.", i),
        })
        .collect()
}

pub fn sample_answer() -> ResearchAnswer {
    ResearchAnswer {
        summary: "Quantum computers use qubits.".to_string(),
        citations: vec![Citation {
            url: "https://example.com/article-1".to_string(),
            title: Some("Result 1".to_string()),
        }],
    }
}

/// A model reply in the expected JSON format citing `urls`.
pub fn model_reply(summary: &str, urls: &[&str]) -> String {
    let citations: Vec<serde_json::Value> = urls
        .iter()
        .map(|url| serde_json::json!({ "url": url }))
        .collect();
    serde_json::json!({ "summary": summary, "citations": citations }).to_string()
}
