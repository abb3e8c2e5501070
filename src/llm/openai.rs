use crate::llm::client::{ChatMessage, LLMClient};
use crate::types::{ResearchError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Client for any OpenAI-compatible `/chat/completions` endpoint.
pub struct OpenAIClient {
    http: reqwest::Client,
    api_key: String,
    api_base: String,
    model: String,
    temperature: f32,
    timeout: Duration,
}

impl OpenAIClient {
    pub fn new(api_key: String, api_base: String, model: String) -> Result<Self> {
        let http = reqwest::Client::builder().build().map_err(|e| {
            ResearchError::ModelUnavailable(format!("Failed to build HTTP client: {}", e))
        })?;

        Ok(Self {
            http,
            api_key,
            api_base: api_base.trim_end_matches('/').to_string(),
            model,
            temperature: 0.2,
            timeout: Duration::from_secs(60),
        })
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Deadline applied to each request.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let request = CompletionRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ApiError>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            return Err(ResearchError::ModelUnavailable(format!(
                "API error ({}): {}",
                status, detail
            )));
        }

        let body: CompletionResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                ResearchError::ModelTimeout(e.to_string())
            } else {
                ResearchError::MalformedOutput(format!("Failed to parse response: {}", e))
            }
        })?;

        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| ResearchError::MalformedOutput("model returned no content".to_string()))
    }
}

#[async_trait]
impl LLMClient for OpenAIClient {
    async fn generate_with_history(&self, messages: &[ChatMessage]) -> Result<String> {
        tokio::time::timeout(self.timeout, self.complete(messages))
            .await
            .map_err(|_| {
                ResearchError::ModelTimeout(format!(
                    "no response within {} ms",
                    self.timeout.as_millis()
                ))
            })?
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

fn classify_transport_error(e: reqwest::Error) -> ResearchError {
    if e.is_timeout() {
        ResearchError::ModelTimeout(e.to_string())
    } else {
        ResearchError::ModelUnavailable(e.to_string())
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}
