//! Caching facade over two backends
//!
//! The cache system operates in one of two mutually exclusive modes:
//! 1. **Local mode (memory)**: in-process caching using `moka`. Used when
//!    Redis is not configured.
//! 2. **Remote mode (Redis)**: remote caching using Redis. Used when
//!    `redis_url` is configured.
//!
//! This split keeps behavior predictable: single instances get a fast
//! local cache, deployments that share state point at Redis. The
//! [`CacheAdapter`] unifies both behind typed JSON operations.

mod adapter;
mod memory;
mod redis;

pub use adapter::CacheAdapter;
pub use memory::MemoryCache;
pub use redis::RedisCache;

use crate::config::CacheSettings;
use cachefront_domain::error::Result;
use cachefront_domain::ports::CacheBackend;
use std::sync::Arc;

/// Build the cache adapter from settings
///
/// Selects the backend from configuration: Redis when `redis_url` is set
/// (with a strict connection probe, so a misconfigured Redis fails fast),
/// the memory backend otherwise. The Redis handle is also returned
/// separately so callers can reach the data-structure operations that
/// only Redis provides.
pub async fn build_cache(
    settings: &CacheSettings,
) -> Result<(CacheAdapter, Option<Arc<RedisCache>>)> {
    match settings.connection_url() {
        Some(url) => {
            tracing::info!("Redis configured, connecting to {}", url);
            let store = Arc::new(RedisCache::connect(&url).await?);
            tracing::info!("Redis cache connection established (remote mode)");
            let backend: Arc<dyn CacheBackend> = store.clone();
            Ok((CacheAdapter::new(backend, settings), Some(store)))
        }
        None => {
            tracing::info!("Redis not configured, using in-process memory cache (local mode)");
            let backend: Arc<dyn CacheBackend> = Arc::new(MemoryCache::new(settings));
            Ok((CacheAdapter::new(backend, settings), None))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_build_cache_local_mode() {
        let settings = CacheSettings::default();
        let (adapter, redis) = build_cache(&settings).await.unwrap();
        assert!(redis.is_none());
        assert_eq!(adapter.backend_name(), "memory");
    }

    #[tokio::test]
    async fn test_build_cache_fails_on_unreachable_redis() {
        let settings = CacheSettings {
            redis_url: Some("redis://127.0.0.1:1".to_string()),
            ..Default::default()
        };
        let result = build_cache(&settings).await;
        assert!(result.is_err());
    }
}
