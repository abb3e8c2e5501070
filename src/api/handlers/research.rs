use crate::{
    types::{ErrorResponse, ResearchError, ResearchRequest, ResearchResponse, Result},
    AppState,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use std::time::Instant;
use uuid::Uuid;

/// Run a research cycle for a query
#[utoipa::path(
    post,
    path = "/api/research",
    request_body = ResearchRequest,
    responses(
        (status = 200, description = "Research completed", body = ResearchResponse),
        (status = 400, description = "Unreadable or blank query", body = ErrorResponse),
        (status = 503, description = "Search or summarization kept failing", body = ErrorResponse)
    ),
    tag = "research"
)]
pub async fn research(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ResearchRequest>, JsonRejection>,
) -> Result<Json<ResearchResponse>> {
    let Json(payload) = payload.map_err(|e| ResearchError::InvalidQuery(e.body_text()))?;
    let start = Instant::now();
    let task_id = payload
        .task_id
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let answer = state.orchestrator.run(&payload.query).await?;

    Ok(Json(ResearchResponse {
        task_id,
        status: "completed".to_string(),
        answer,
        duration_ms: start.elapsed().as_millis() as u64,
    }))
}
