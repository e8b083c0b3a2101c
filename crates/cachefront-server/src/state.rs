//! Shared request state

use cachefront_infrastructure::cache::{CacheAdapter, RedisCache};
use cachefront_infrastructure::config::AppConfig;
use rocket::http::Status;
use rocket::serde::json::Json;
use std::sync::Arc;
use std::time::Instant;

use crate::handlers::ErrorResponse;

/// State shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Namespaced cache facade (memory or Redis, per configuration)
    pub cache: CacheAdapter,
    /// Direct Redis handle; `None` when running on the in-process cache
    pub redis: Option<Arc<RedisCache>>,
    /// Loaded configuration
    pub config: AppConfig,
    /// Server start time, for uptime reporting
    pub started_at: Instant,
}

impl AppState {
    /// Get the Redis handle, or a 503 when no Redis is configured
    pub fn redis(&self) -> Result<&Arc<RedisCache>, (Status, Json<ErrorResponse>)> {
        self.redis.as_ref().ok_or_else(|| {
            (
                Status::ServiceUnavailable,
                Json(ErrorResponse::redis_unavailable()),
            )
        })
    }
}
