//! HTTP API Handlers and Routes
//!
//! The HTTP surface of the research agent, built on the Axum web framework.
//!
//! # Module Structure
//!
//! - [`api::handlers`](crate::api::handlers) - Request handlers for each endpoint
//! - [`api::routes`](crate::api::routes) - Route definitions and router configuration
//!
//! # Endpoints
//!
//! - `POST /` - A2A JSON-RPC 2.0 (`tasks/send`, `tasks/get`, `tasks/cancel`)
//! - `GET /.well-known/agent.json` - Agent card
//! - `POST /api/research` - Plain REST research request
//! - `GET /health` - Health check endpoint
//! - `GET /api-docs/openapi.json` - OpenAPI document for the REST endpoints

/// Request and response handlers for all API endpoints.
pub mod handlers;
/// Router configuration and route definitions.
pub mod routes;

use crate::types::{Citation, ErrorResponse, ResearchAnswer, ResearchRequest, ResearchResponse};
use utoipa::OpenApi;

/// OpenAPI description of the REST endpoints.
#[derive(OpenApi)]
#[openapi(
    info(title = "Research Agent API"),
    paths(handlers::research::research, handlers::health::health),
    components(schemas(
        ResearchRequest,
        ResearchResponse,
        ResearchAnswer,
        Citation,
        ErrorResponse
    )),
    tags(
        (name = "research", description = "Web research with cited answers"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;
