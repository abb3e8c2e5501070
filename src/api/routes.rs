use crate::{api::handlers, AppState};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", post(handlers::a2a::rpc))
        .route("/.well-known/agent.json", get(handlers::a2a::agent_card))
        .route("/api/research", post(handlers::research::research))
        .route("/health", get(handlers::health::health))
        .route("/api-docs/openapi.json", get(handlers::health::openapi))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
