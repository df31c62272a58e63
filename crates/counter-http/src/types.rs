//! HTTP response bodies.

use serde::Serialize;

/// Body of `GET /`.
#[derive(Debug, Serialize)]
pub struct HomeResponse {
    #[serde(rename = "Message")]
    pub message: String,
    #[serde(rename = "Count")]
    pub count: usize,
}

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub window_seconds: u64,
    /// Requests currently recorded in the window (read-only, not slid).
    pub window_count: usize,
}
