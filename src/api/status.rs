// Service-Level Endpoints
//
// Liveness and Prometheus exposition. Neither touches an upstream.

use axum::{http::header, response::IntoResponse, Json};

use super::helpers::{track, ApiResult};
use super::types::HealthResponse;
use crate::metrics::{gather_metrics, record_http_request};

/// GET /health
pub async fn health() -> ApiResult<HealthResponse> {
    track("/health", Ok(Json(HealthResponse::ok())))
}

/// GET /metrics
pub async fn metrics_handler() -> impl IntoResponse {
    record_http_request("/metrics", 200);
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        gather_metrics(),
    )
}
