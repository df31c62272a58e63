//! System endpoints: health, metrics, and the 404 fallback.

use axum::extract::{Json, State};
use axum::http::{StatusCode, Uri};
use axum::response::IntoResponse;
use counter_service::ServiceState;

use crate::error::ApiError;
use crate::types::HealthResponse;

/// Server status plus a read-only view of the window.
pub async fn health(State(state): State<ServiceState>) -> impl IntoResponse {
    let counter = state.counter();
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_secs(),
        window_seconds: counter.window_length().as_secs(),
        window_count: counter.value(),
    })
}

/// Prometheus-compatible metrics endpoint.
pub async fn metrics_endpoint(State(state): State<ServiceState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        state.render_metrics(),
    )
}

pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("no route for {}", uri.path()))
}
