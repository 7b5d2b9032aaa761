//! Health check endpoint handler.

use crate::api::AppState;
use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    /// "delegation" or "direct"
    pub mode: String,
    pub provider: String,
    pub uptime_seconds: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// GET /health - Report whether the active provider can answer.
pub async fn handle(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let mode = state.orchestrator.mode();
    let report = state.orchestrator.health().await;

    Json(HealthResponse {
        status: if report.healthy { "healthy" } else { "unhealthy" }.to_string(),
        mode: mode.label().to_string(),
        provider: mode.provider_name().to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        latency_ms: report.latency_ms,
        error: report.error,
    })
}
