use crate::api::ApiDoc;
use axum::Json;
use utoipa::OpenApi;

/// Liveness probe
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is running", body = String)),
    tag = "health"
)]
pub async fn health() -> &'static str {
    "OK"
}

/// OpenAPI document of the REST endpoints.
pub async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
