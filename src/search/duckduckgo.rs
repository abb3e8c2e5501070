//! DuckDuckGo search via the HTML endpoint
//!
//! Fetches `{base_url}/html/?q=<query>` and extracts the organic results.
//! Result links on this endpoint are usually redirects of the form
//! `//duckduckgo.com/l/?uddg=<target>`; they are unwrapped to the target URL.

use crate::search::{clamp_max_results, SearchClient};
use crate::types::{ResearchError, ResearchQuery, Result, SearchResult};
use async_trait::async_trait;
use reqwest::Url;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::time::Duration;

/// Default public endpoint.
pub const DEFAULT_BASE_URL: &str = "https://html.duckduckgo.com";

/// Web search backed by DuckDuckGo.
pub struct DuckDuckGoClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl DuckDuckGoClient {
    /// Create a client against `base_url` with a per-request deadline.
    pub fn new(base_url: &str, timeout: Duration, user_agent: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(user_agent)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| {
                ResearchError::ProviderUnavailable(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    async fn fetch(&self, query: &ResearchQuery) -> Result<String> {
        let response = self
            .http
            .get(format!("{}/html/", self.base_url))
            .query(&[("q", query.as_str())])
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResearchError::ProviderUnavailable(format!(
                "DuckDuckGo returned HTTP {}",
                status
            )));
        }

        response.text().await.map_err(classify_transport_error)
    }
}

#[async_trait]
impl SearchClient for DuckDuckGoClient {
    async fn search(&self, query: &ResearchQuery, max_results: usize) -> Result<Vec<SearchResult>> {
        let max_results = clamp_max_results(max_results);

        let body = tokio::time::timeout(self.timeout, self.fetch(query))
            .await
            .map_err(|_| {
                ResearchError::ProviderTimeout(format!(
                    "no response within {} ms",
                    self.timeout.as_millis()
                ))
            })??;

        let results = parse_results(&body, max_results)?;
        tracing::debug!(
            query = query.as_str(),
            count = results.len(),
            "DuckDuckGo search completed"
        );
        Ok(results)
    }

    fn name(&self) -> &str {
        "duckduckgo"
    }
}

fn classify_transport_error(e: reqwest::Error) -> ResearchError {
    if e.is_timeout() {
        ResearchError::ProviderTimeout(e.to_string())
    } else {
        ResearchError::ProviderUnavailable(e.to_string())
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| {
        ResearchError::ProviderUnavailable(format!("Invalid result selector '{}': {}", css, e))
    })
}

/// Extract ranked organic results from a DuckDuckGo HTML page.
pub fn parse_results(body: &str, max_results: usize) -> Result<Vec<SearchResult>> {
    let result_sel = selector("div.result")?;
    let link_sel = selector("a.result__a")?;
    let snippet_sel = selector(".result__snippet")?;

    let document = Html::parse_document(body);
    let mut seen = HashSet::new();
    let mut results = Vec::new();

    for block in document.select(&result_sel) {
        if results.len() >= max_results {
            break;
        }

        let is_ad = block
            .value()
            .attr("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == "result--ad"));
        if is_ad {
            continue;
        }

        let Some(link) = block.select(&link_sel).next() else {
            continue;
        };
        let Some(url) = link.value().attr("href").and_then(resolve_link) else {
            continue;
        };

        let title = collapse_whitespace(&link.text().collect::<String>());
        if title.is_empty() || !seen.insert(url.clone()) {
            continue;
        }

        let snippet = block
            .select(&snippet_sel)
            .next()
            .map(|s| collapse_whitespace(&s.text().collect::<String>()))
            .unwrap_or_default();

        results.push(SearchResult {
            title,
            url,
            snippet,
        });
    }

    Ok(results)
}

/// Turn a result href into an absolute http(s) URL, unwrapping
/// DuckDuckGo redirect links. Returns `None` for anything unusable.
pub fn resolve_link(href: &str) -> Option<String> {
    let href = href.trim();
    let absolute = if href.starts_with("//") {
        format!("https:{}", href)
    } else if href.starts_with('/') {
        format!("https://duckduckgo.com{}", href)
    } else {
        href.to_string()
    };

    let url = Url::parse(&absolute).ok()?;
    let is_ddg = url
        .host_str()
        .is_some_and(|host| host == "duckduckgo.com" || host.ends_with(".duckduckgo.com"));

    let target = if is_ddg {
        if !url.path().starts_with("/l/") {
            return None;
        }
        let encoded = url
            .query_pairs()
            .find(|(key, _)| key == "uddg")
            .map(|(_, value)| value.into_owned())?;
        Url::parse(&encoded).ok()?
    } else {
        url
    };

    matches!(target.scheme(), "http" | "https").then(|| target.to_string())
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
