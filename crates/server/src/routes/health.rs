//! Health check endpoint

use axum::Json;
use serde::Serialize;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
}

/// GET /health - Process liveness; upstream providers are not probed
pub async fn check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy" })
}
