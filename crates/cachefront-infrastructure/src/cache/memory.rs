//! In-process memory backend
//!
//! Local caching using the Moka library. Suitable for single-node
//! deployments or testing.
//!
//! ## Features
//! - Capacity-bound storage with eviction statistics
//! - Per-entry TTL via an expiry policy (entries without an explicit TTL
//!   fall back to the configured default)
//! - Atomic get-or-set through Moka's entry API

use crate::config::CacheSettings;
use async_trait::async_trait;
use cachefront_domain::error::{Error, Result};
use cachefront_domain::ports::{CacheBackend, CacheStats, EntryOptions, HealthStatus};
use moka::future::Cache;
use moka::Expiry;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Stored cache value with its own TTL
#[derive(Clone)]
struct MemoryEntry {
    data: Vec<u8>,
    ttl: Option<Duration>,
}

/// Expiry policy reading each entry's TTL, with a configured fallback
struct PerEntryExpiry {
    default_ttl: Duration,
}

impl Expiry<String, MemoryEntry> for PerEntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &MemoryEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl.unwrap_or(self.default_ttl))
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &MemoryEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl.unwrap_or(self.default_ttl))
    }
}

/// Moka-based memory backend
pub struct MemoryCache {
    cache: Cache<String, MemoryEntry>,

    stats_hits: Arc<AtomicU64>,
    stats_misses: Arc<AtomicU64>,
    stats_evictions: Arc<AtomicU64>,
}

impl MemoryCache {
    /// Create a new memory backend from cache settings
    pub fn new(settings: &CacheSettings) -> Self {
        let stats_evictions = Arc::new(AtomicU64::new(0));

        let evictions = stats_evictions.clone();
        let cache = Cache::builder()
            .max_capacity(settings.max_entries)
            .expire_after(PerEntryExpiry {
                default_ttl: Duration::from_secs(settings.default_ttl_secs),
            })
            .eviction_listener(move |_k, _v, _cause| {
                evictions.fetch_add(1, Ordering::Relaxed);
            })
            .support_invalidation_closures()
            .build();

        Self {
            cache,
            stats_hits: Arc::new(AtomicU64::new(0)),
            stats_misses: Arc::new(AtomicU64::new(0)),
            stats_evictions,
        }
    }

    fn decode(data: Vec<u8>) -> Result<String> {
        String::from_utf8(data)
            .map_err(|e| Error::cache(format!("invalid UTF-8 in cached value: {}", e)))
    }
}

#[async_trait]
impl CacheBackend for MemoryCache {
    async fn get_json(&self, key: &str) -> Result<Option<String>> {
        match self.cache.get(key).await {
            Some(entry) => {
                self.stats_hits.fetch_add(1, Ordering::Relaxed);
                Ok(Some(Self::decode(entry.data)?))
            }
            None => {
                self.stats_misses.fetch_add(1, Ordering::Relaxed);
                Ok(None)
            }
        }
    }

    async fn set_json(&self, key: &str, value: &str, options: EntryOptions) -> Result<()> {
        let entry = MemoryEntry {
            data: value.as_bytes().to_vec(),
            ttl: options.ttl,
        };
        self.cache.insert(key.to_string(), entry).await;
        Ok(())
    }

    async fn get_or_set_json(
        &self,
        key: &str,
        value: &str,
        options: EntryOptions,
    ) -> Result<(String, bool)> {
        let candidate = MemoryEntry {
            data: value.as_bytes().to_vec(),
            ttl: options.ttl,
        };

        let entry = self
            .cache
            .entry(key.to_string())
            .or_insert_with(async move { candidate })
            .await;

        let fresh = entry.is_fresh();
        if fresh {
            self.stats_misses.fetch_add(1, Ordering::Relaxed);
        } else {
            self.stats_hits.fetch_add(1, Ordering::Relaxed);
        }

        Ok((Self::decode(entry.into_value().data)?, fresh))
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let existed = self.cache.contains_key(key);
        self.cache.invalidate(key).await;
        Ok(existed)
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.cache.contains_key(key))
    }

    async fn clear(&self, prefix: Option<&str>) -> Result<()> {
        match prefix {
            Some(p) => {
                let p = p.to_string();
                if let Err(e) = self.cache.invalidate_entries_if(move |k, _v| k.starts_with(&p)) {
                    return Err(Error::cache(format!("failed to invalidate prefix: {}", e)));
                }
            }
            None => self.cache.invalidate_all(),
        }
        self.cache.run_pending_tasks().await;
        Ok(())
    }

    async fn stats(&self) -> Result<CacheStats> {
        // Flush pending maintenance so entry_count is accurate
        self.cache.run_pending_tasks().await;

        let mut stats = CacheStats {
            hits: self.stats_hits.load(Ordering::Relaxed),
            misses: self.stats_misses.load(Ordering::Relaxed),
            entries: self.cache.entry_count(),
            evictions: self.stats_evictions.load(Ordering::Relaxed),
            hit_rate: 0.0,
        };
        stats.hit_rate = stats.calculate_hit_rate();
        Ok(stats)
    }

    async fn size(&self) -> Result<usize> {
        self.cache.run_pending_tasks().await;
        Ok(self.cache.entry_count() as usize)
    }

    async fn health(&self) -> Result<HealthStatus> {
        // An in-process cache is healthy unless eviction dominates: more
        // evictions than twice the hits suggests the capacity is too small.
        let evictions = self.stats_evictions.load(Ordering::Relaxed);
        let hits = self.stats_hits.load(Ordering::Relaxed);

        if hits > 0 && evictions > hits * 2 {
            Ok(HealthStatus::Degraded)
        } else {
            Ok(HealthStatus::Healthy)
        }
    }

    fn backend_name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_backend() -> MemoryCache {
        MemoryCache::new(&CacheSettings::default())
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let backend = test_backend();

        backend
            .set_json("k1", "\"v1\"", EntryOptions::new())
            .await
            .unwrap();

        let value = backend.get_json("k1").await.unwrap();
        assert_eq!(value.as_deref(), Some("\"v1\""));
    }

    #[tokio::test]
    async fn test_get_miss() {
        let backend = test_backend();
        assert_eq!(backend.get_json("absent").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete() {
        let backend = test_backend();

        backend
            .set_json("k1", "\"v1\"", EntryOptions::new())
            .await
            .unwrap();

        assert!(backend.delete("k1").await.unwrap());
        assert_eq!(backend.get_json("k1").await.unwrap(), None);
        assert!(!backend.delete("k1").await.unwrap());
    }

    #[tokio::test]
    async fn test_per_entry_ttl_expires() {
        let backend = test_backend();

        backend
            .set_json(
                "short",
                "\"v\"",
                EntryOptions::new().with_ttl(Duration::from_millis(50)),
            )
            .await
            .unwrap();

        assert!(backend.get_json("short").await.unwrap().is_some());
        tokio::time::sleep(Duration::from_millis(120)).await;
        assert_eq!(backend.get_json("short").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_get_or_set_inserts_when_absent() {
        let backend = test_backend();

        let (value, fresh) = backend
            .get_or_set_json("k", "\"new\"", EntryOptions::new())
            .await
            .unwrap();
        assert_eq!(value, "\"new\"");
        assert!(fresh);
    }

    #[tokio::test]
    async fn test_get_or_set_returns_existing() {
        let backend = test_backend();

        backend
            .set_json("k", "\"old\"", EntryOptions::new())
            .await
            .unwrap();

        let (value, fresh) = backend
            .get_or_set_json("k", "\"new\"", EntryOptions::new())
            .await
            .unwrap();
        assert_eq!(value, "\"old\"");
        assert!(!fresh);
    }

    #[tokio::test]
    async fn test_clear_prefix() {
        let backend = test_backend();

        backend
            .set_json("app:k1", "\"v\"", EntryOptions::new())
            .await
            .unwrap();
        backend
            .set_json("other:k1", "\"v\"", EntryOptions::new())
            .await
            .unwrap();

        backend.clear(Some("app:")).await.unwrap();
        // Invalidation closures apply lazily; reads observe them immediately
        assert_eq!(backend.get_json("app:k1").await.unwrap(), None);
        assert!(backend.get_json("other:k1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_clear_all() {
        let backend = test_backend();

        backend
            .set_json("k1", "\"v\"", EntryOptions::new())
            .await
            .unwrap();
        backend
            .set_json("k2", "\"v\"", EntryOptions::new())
            .await
            .unwrap();

        backend.clear(None).await.unwrap();
        assert_eq!(backend.get_json("k1").await.unwrap(), None);
        assert_eq!(backend.size().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_stats_track_hits_and_misses() {
        let backend = test_backend();

        backend
            .set_json("k1", "\"v\"", EntryOptions::new())
            .await
            .unwrap();
        backend.get_json("k1").await.unwrap(); // hit
        backend.get_json("absent").await.unwrap(); // miss

        let stats = backend.stats().await.unwrap();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert!((stats.hit_rate - 0.5).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_capacity_bound_evicts() {
        let settings = CacheSettings {
            max_entries: 2,
            ..Default::default()
        };
        let backend = MemoryCache::new(&settings);

        for i in 0..4 {
            backend
                .set_json(&format!("k{}", i), "\"v\"", EntryOptions::new())
                .await
                .unwrap();
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        backend.cache.run_pending_tasks().await;
        assert!(backend.cache.entry_count() <= 2);
    }

    #[tokio::test]
    async fn test_health_is_healthy() {
        let backend = test_backend();
        assert_eq!(backend.health().await.unwrap(), HealthStatus::Healthy);
    }
}
