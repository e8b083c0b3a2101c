//! Cache Backend Port
//!
//! Port for cache backends. Two implementations exist: an in-memory
//! backend (Moka) and a distributed backend (Redis). Both store values as
//! JSON text with TTL support; typed access is layered on top by the
//! cache adapter in the infrastructure crate.

use crate::constants::DEFAULT_TTL_SECS;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Per-entry storage configuration
///
/// Configures how a single cache entry is stored. An absent TTL falls
/// back to the backend's default.
///
/// # Example
///
/// ```
/// use cachefront_domain::EntryOptions;
/// use std::time::Duration;
///
/// let options = EntryOptions::new().with_ttl(Duration::from_secs(600));
/// assert_eq!(options.effective_ttl(), Duration::from_secs(600));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntryOptions {
    /// Time to live for the cache entry
    pub ttl: Option<Duration>,
}

impl EntryOptions {
    /// Create options with no explicit TTL (backend default applies)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the TTL for the cache entry
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Set the TTL in seconds
    pub fn with_ttl_secs(mut self, secs: u64) -> Self {
        self.ttl = Some(Duration::from_secs(secs));
        self
    }

    /// Get the effective TTL, falling back to the default
    pub fn effective_ttl(&self) -> Duration {
        self.ttl.unwrap_or(Duration::from_secs(DEFAULT_TTL_SECS))
    }
}

/// Cache operation statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheStats {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of live cache entries
    pub entries: u64,
    /// Cache hit rate (0.0 to 1.0)
    pub hit_rate: f64,
    /// Number of evicted entries
    pub evictions: u64,
}

impl CacheStats {
    /// Create empty cache statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Calculate hit rate from hits and misses
    pub fn calculate_hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total > 0 {
            self.hits as f64 / total as f64
        } else {
            0.0
        }
    }
}

/// Backend health as reported by a probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Backend is reachable and behaving normally
    Healthy,
    /// Backend works but shows signs of pressure (e.g. heavy eviction)
    Degraded,
    /// Backend is unreachable or failing
    Unhealthy,
}

/// Cache Backend Port
///
/// Defines the contract for cache backends. Implementations must provide
/// JSON-based storage with TTL support.
///
/// # Implementations
///
/// - **Memory**: in-process cache built on Moka
/// - **Redis**: remote store accessed through the redis client
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Get a value from the cache as a JSON string
    ///
    /// Returns the cached JSON if present, `None` if missing or expired.
    async fn get_json(&self, key: &str) -> Result<Option<String>>;

    /// Store a JSON string under a key
    async fn set_json(&self, key: &str, value: &str, options: EntryOptions) -> Result<()>;

    /// Get the value under a key, inserting `value` if the key is absent
    ///
    /// Returns the resulting JSON and `true` when the provided value was
    /// freshly inserted, `false` when an existing value was returned.
    /// The check-and-insert is atomic within the backend.
    async fn get_or_set_json(
        &self,
        key: &str,
        value: &str,
        options: EntryOptions,
    ) -> Result<(String, bool)>;

    /// Delete a key
    ///
    /// Returns `true` if the key existed.
    async fn delete(&self, key: &str) -> Result<bool>;

    /// Check whether a key exists and has not expired
    async fn exists(&self, key: &str) -> Result<bool>;

    /// Remove entries, optionally restricted to keys under a prefix
    ///
    /// `clear(None)` drops everything the backend holds; `clear(Some(p))`
    /// drops only keys beginning with `p`.
    async fn clear(&self, prefix: Option<&str>) -> Result<()>;

    /// Get cache statistics
    async fn stats(&self) -> Result<CacheStats>;

    /// Get the number of live entries
    async fn size(&self) -> Result<usize>;

    /// Probe backend health
    async fn health(&self) -> Result<HealthStatus>;

    /// Identifier of this backend (e.g. "memory", "redis")
    fn backend_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_options_default_ttl() {
        let options = EntryOptions::new();
        assert_eq!(options.effective_ttl(), Duration::from_secs(DEFAULT_TTL_SECS));
    }

    #[test]
    fn test_entry_options_explicit_ttl() {
        let options = EntryOptions::new().with_ttl_secs(42);
        assert_eq!(options.effective_ttl(), Duration::from_secs(42));
    }

    #[test]
    fn test_stats_hit_rate() {
        let stats = CacheStats {
            hits: 3,
            misses: 1,
            ..Default::default()
        };
        assert!((stats.calculate_hit_rate() - 0.75).abs() < f64::EPSILON);

        let empty = CacheStats::new();
        assert_eq!(empty.calculate_hit_rate(), 0.0);
    }

    #[test]
    fn test_health_status_serialization() {
        let json = serde_json::to_string(&HealthStatus::Degraded).unwrap();
        assert_eq!(json, "\"degraded\"");
    }
}
