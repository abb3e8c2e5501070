use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

// ============= Research Domain Types =============

/// A validated research topic.
///
/// Always non-empty after trimming; the trimmed text is what gets stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResearchQuery(String);

impl ResearchQuery {
    /// Validate raw caller input into a query.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ResearchError::InvalidQuery(
                "query must not be empty".to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The trimmed query text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One ranked hit returned by a search provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// A source attributed to the summary. The url always comes from the
/// search results of the same cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Citation {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Final product of a research cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ResearchAnswer {
    pub summary: String,
    pub citations: Vec<Citation>,
}

impl ResearchAnswer {
    /// Render the answer as plain text with a trailing `Sources:` section
    /// listing one cited url per line.
    pub fn to_text(&self) -> String {
        if self.citations.is_empty() {
            return self.summary.clone();
        }

        let sources: Vec<&str> = self.citations.iter().map(|c| c.url.as_str()).collect();
        format!("{}\n\nSources:\n{}", self.summary, sources.join("\n"))
    }
}

/// Stage of a research cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ResearchPhase {
    Idle,
    Searching,
    Summarizing,
    Done,
    Failed,
}

impl fmt::Display for ResearchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResearchPhase::Idle => "idle",
            ResearchPhase::Searching => "searching",
            ResearchPhase::Summarizing => "summarizing",
            ResearchPhase::Done => "done",
            ResearchPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

// ============= API Request/Response Types =============

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ResearchRequest {
    /// Caller supplied task id; generated when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    pub query: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ResearchResponse {
    pub task_id: String,
    pub status: String,
    pub answer: ResearchAnswer,
    pub duration_ms: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: String,
}

// ============= Error Types =============

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResearchError {
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Search provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Search provider timed out: {0}")]
    ProviderTimeout(String),

    #[error("Language model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Language model timed out: {0}")]
    ModelTimeout(String),

    #[error("Malformed model output: {0}")]
    MalformedOutput(String),

    #[error("Research unavailable while {phase}: {reason}")]
    ResearchUnavailable {
        phase: ResearchPhase,
        reason: String,
    },
}

impl ResearchError {
    /// Stable machine-readable identifier of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ResearchError::InvalidQuery(_) => "invalid_query",
            ResearchError::ProviderUnavailable(_) => "provider_unavailable",
            ResearchError::ProviderTimeout(_) => "provider_timeout",
            ResearchError::ModelUnavailable(_) => "model_unavailable",
            ResearchError::ModelTimeout(_) => "model_timeout",
            ResearchError::MalformedOutput(_) => "malformed_output",
            ResearchError::ResearchUnavailable { .. } => "research_unavailable",
        }
    }

    /// Whether the orchestrator may try the failing call again.
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            ResearchError::InvalidQuery(_) | ResearchError::ResearchUnavailable { .. }
        )
    }

    /// HTTP status used when the error crosses the REST boundary.
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            ResearchError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            ResearchError::ProviderTimeout(_) | ResearchError::ModelTimeout(_) => {
                StatusCode::GATEWAY_TIMEOUT
            }
            ResearchError::ProviderUnavailable(_)
            | ResearchError::ModelUnavailable(_)
            | ResearchError::MalformedOutput(_) => StatusCode::BAD_GATEWAY,
            ResearchError::ResearchUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl axum::response::IntoResponse for ResearchError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: self.to_string(),
            kind: self.kind().to_string(),
        };

        (status, axum::Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ResearchError>;
