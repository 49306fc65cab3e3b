//! Health check handlers

use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;

/// Root welcome response
#[derive(Serialize)]
pub struct WelcomeResponse {
    pub message: String,
}

/// Welcome message at the API root
pub async fn welcome() -> impl IntoResponse {
    Json(WelcomeResponse {
        message: "Welcome to the SynKro Assist API!".to_string(),
    })
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub uptime_seconds: u64,
}

/// Liveness probe - basic health check
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is alive")
    )
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_secs(),
    })
}

/// Readiness response
#[derive(Serialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub knowledge_entries: usize,
    pub checks: ReadinessChecks,
}

#[derive(Serialize)]
pub struct ReadinessChecks {
    pub knowledge_base: bool,
    pub llm_configured: bool,
    pub chat_log: bool,
}

/// Readiness probe.
///
/// Startup is fail-fast: every capability was constructed before the server
/// bound, so a serving process reports ready. The knowledge base check shows
/// whether any entries were loaded.
#[utoipa::path(
    get,
    path = "/ready",
    tag = "health",
    responses(
        (status = 200, description = "Service is ready")
    )
)]
pub async fn readiness_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let checks = ReadinessChecks {
        knowledge_base: !state.engine.knowledge_base_is_empty(),
        llm_configured: true,
        chat_log: true,
    };

    Json(ReadinessResponse {
        ready: true,
        knowledge_entries: state.engine.knowledge_entries(),
        checks,
    })
}

/// JSON metrics response
#[derive(Serialize)]
pub struct MetricsResponse {
    pub uptime_seconds: u64,
    pub total_requests: u64,
    pub requests_per_second: f64,
    pub knowledge_entries: usize,
    pub match_threshold: f32,
    pub embedding_dimension: usize,
}

pub async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let uptime = state.uptime_secs();
    let total_requests = state.get_request_count();
    let rps = if uptime > 0 {
        total_requests as f64 / uptime as f64
    } else {
        0.0
    };

    Json(MetricsResponse {
        uptime_seconds: uptime,
        total_requests,
        requests_per_second: rps,
        knowledge_entries: state.engine.knowledge_entries(),
        match_threshold: state.engine.match_threshold(),
        embedding_dimension: state.engine.embedding_dimension(),
    })
}
