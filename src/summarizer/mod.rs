//! Summarization of search results into a cited answer
//!
//! [`SummarizerClient`] turns a query and its search results into a
//! [`ResearchAnswer`]. [`LlmSummarizer`] does this with any [`LLMClient`]:
//!
//! 1. no results: a fixed "no sources found" answer, the model is not called
//! 2. the numbered results are sent with a request for a JSON object
//! 3. claimed citations are checked against the results
//! 4. a reply that cannot be parsed, or cites none of the results, gets
//!    exactly one repair request
//!
//! A model that cannot produce a summary surfaces as `MalformedOutput`; no
//! fallback text is invented.

/// Citation validation.
pub mod citations;
/// Model reply parsing.
pub mod output;

pub use citations::validate_citations;
pub use output::{parse_model_output, ModelOutput};

use crate::llm::{ChatMessage, LLMClient};
use crate::types::{ResearchAnswer, ResearchError, ResearchQuery, Result, SearchResult};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

const SYSTEM_PROMPT: &str = "You are an expert researcher with years of experience \
synthesizing information from the web. You write comprehensive but concise summaries \
that rely only on the search results you are given, and you cite the sources you used.";

const RESPONSE_FORMAT: &str = r#"{"summary": "<summary text>", "citations": [{"url": "<source url>", "title": "<source title>"}]}"#;

/// Produces a cited answer from search results.
#[async_trait]
pub trait SummarizerClient: Send + Sync {
    /// Every citation in the answer must come from `results`.
    async fn summarize(
        &self,
        query: &ResearchQuery,
        results: &[SearchResult],
    ) -> Result<ResearchAnswer>;

    /// Identifier used in logs
    fn name(&self) -> &str;
}

/// Answer returned when the search produced nothing to summarize.
pub fn no_sources_answer(query: &ResearchQuery) -> ResearchAnswer {
    ResearchAnswer {
        summary: format!("No sources were found for \"{}\".", query),
        citations: Vec::new(),
    }
}

/// Summarizer backed by a chat-completion model.
pub struct LlmSummarizer {
    llm: Arc<dyn LLMClient>,
}

impl LlmSummarizer {
    pub fn new(llm: Arc<dyn LLMClient>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl SummarizerClient for LlmSummarizer {
    async fn summarize(
        &self,
        query: &ResearchQuery,
        results: &[SearchResult],
    ) -> Result<ResearchAnswer> {
        if results.is_empty() {
            debug!(query = query.as_str(), "No search results, skipping model call");
            return Ok(no_sources_answer(query));
        }

        let prompt = build_prompt(query, results);
        let reply = self.llm.generate_with_system(SYSTEM_PROMPT, &prompt).await?;

        let reason = match cited_answer(&reply, results) {
            Ok(answer) => return Ok(answer),
            Err(reason) => reason,
        };

        warn!(
            model = self.llm.model_name(),
            reason = %reason,
            "Unusable model reply, requesting repair"
        );
        let messages = [
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(prompt),
            ChatMessage::assistant(reply),
            ChatMessage::user(repair_prompt(&reason)),
        ];
        let repaired = self.llm.generate_with_history(&messages).await?;
        cited_answer(&repaired, results).map_err(ResearchError::MalformedOutput)
    }

    fn name(&self) -> &str {
        "llm"
    }
}

/// Parse a reply and keep the citations that point at `results`. A reply
/// citing none of them is unusable.
fn cited_answer(
    reply: &str,
    results: &[SearchResult],
) -> std::result::Result<ResearchAnswer, String> {
    let output = parse_model_output(reply)?;

    let claimed = output.citations.len();
    let citations = validate_citations(output.citations, results);
    debug!(
        claimed,
        kept = citations.len(),
        "Validated citations against search results"
    );

    if citations.is_empty() {
        return Err(if claimed == 0 {
            "the \"citations\" list was empty".to_string()
        } else {
            "none of the cited URLs appear in the search results".to_string()
        });
    }

    Ok(ResearchAnswer {
        summary: output.summary,
        citations,
    })
}

/// Render the summarization request for `query` over numbered results.
pub fn build_prompt(query: &ResearchQuery, results: &[SearchResult]) -> String {
    let mut prompt = format!("Research topic: {}\n\nSearch results:\n", query);

    for (i, result) in results.iter().enumerate() {
        prompt.push_str(&format!(
            "[{}] {}\nURL: {}\n{}\n\n",
            i + 1,
            result.title,
            result.url,
            result.snippet
        ));
    }

    prompt.push_str(
        "Write a comprehensive but concise summary that directly addresses the topic. \
         Include key facts, different perspectives and recent developments found in the \
         results. Cite only URLs listed above.\n\n\
         Respond with a single JSON object and nothing else:\n",
    );
    prompt.push_str(RESPONSE_FORMAT);
    prompt
}

fn repair_prompt(reason: &str) -> String {
    format!(
        "Your previous reply could not be used: {}. Reply again with only the JSON object, \
         without prose or code fences:\n{}",
        reason, RESPONSE_FORMAT
    )
}
