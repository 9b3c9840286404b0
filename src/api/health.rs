//! Health check endpoint

use axum::Json;
use serde::Serialize;

#[allow(missing_docs)]
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// GET /health - Liveness probe
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
