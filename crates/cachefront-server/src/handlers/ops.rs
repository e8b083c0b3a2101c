//! Operational handlers
//!
//! Health, stats, and Kubernetes-style liveness/readiness probes.

use cachefront_domain::ports::{CacheStats, HealthStatus};
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{get, State};
use serde::Serialize;

use super::{map_error, ApiError, ErrorResponse};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    /// Active backend, "memory" or "redis"
    pub backend: String,
    pub namespace: String,
    pub uptime_secs: u64,
}

#[derive(Debug, Serialize)]
pub struct ProbeStatus {
    pub status: &'static str,
}

/// Health check with backend and uptime
#[get("/health")]
pub async fn health(state: &State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    let status = state.cache.health().await.map_err(map_error)?;
    Ok(Json(HealthResponse {
        status,
        backend: state.cache.backend_name().to_string(),
        namespace: state.cache.namespace().to_string(),
        uptime_secs: state.started_at.elapsed().as_secs(),
    }))
}

/// Cache statistics (hits, misses, entries, hit rate)
#[get("/stats")]
pub async fn stats(state: &State<AppState>) -> Result<Json<CacheStats>, ApiError> {
    let stats = state.cache.stats().await.map_err(map_error)?;
    Ok(Json(stats))
}

/// Liveness probe: the process is up
#[get("/live")]
pub async fn live() -> Json<ProbeStatus> {
    Json(ProbeStatus { status: "alive" })
}

/// Readiness probe: the backend answers
#[get("/ready")]
pub async fn ready(state: &State<AppState>) -> Result<Json<ProbeStatus>, ApiError> {
    match state.cache.health().await.map_err(map_error)? {
        HealthStatus::Unhealthy => Err((
            Status::ServiceUnavailable,
            Json(ErrorResponse::internal("cache backend is unhealthy")),
        )),
        _ => Ok(Json(ProbeStatus { status: "ready" })),
    }
}
