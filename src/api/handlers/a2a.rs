use crate::{
    a2a::{AgentCard, JsonRpcResponse},
    AppState,
};
use axum::{body::Bytes, extract::State, Json};

/// A2A JSON-RPC 2.0 endpoint.
///
/// Always answers HTTP 200; failures travel in the JSON-RPC `error` member.
pub async fn rpc(State(state): State<AppState>, body: Bytes) -> Json<JsonRpcResponse> {
    Json(state.tasks.handle_payload(&body).await)
}

/// Serve the agent card.
pub async fn agent_card(State(state): State<AppState>) -> Json<AgentCard> {
    Json(state.agent_card.as_ref().clone())
}
