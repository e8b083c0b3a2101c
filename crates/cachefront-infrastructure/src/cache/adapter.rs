//! Cache adapter
//!
//! Typed facade over a [`CacheBackend`]. Callers work with serde types;
//! the adapter handles JSON encoding, key namespacing, and the disabled
//! short-circuit so business code never branches on cache availability.

use cachefront_domain::constants::KEY_SEPARATOR;
use cachefront_domain::error::Result;
use cachefront_domain::ports::{CacheBackend, CacheStats, EntryOptions, HealthStatus};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::config::CacheSettings;

/// Typed, namespaced view over a cache backend
#[derive(Clone)]
pub struct CacheAdapter {
    backend: Arc<dyn CacheBackend>,
    namespace: String,
    enabled: bool,
    default_ttl: Duration,
}

impl CacheAdapter {
    pub fn new(backend: Arc<dyn CacheBackend>, settings: &CacheSettings) -> Self {
        Self {
            backend,
            namespace: settings.namespace.clone(),
            enabled: settings.enabled,
            default_ttl: Duration::from_secs(settings.default_ttl_secs),
        }
    }

    /// Prefix a caller key with the configured namespace
    fn namespaced_key(&self, key: &str) -> String {
        format!("{}{}{}", self.namespace, KEY_SEPARATOR, key)
    }

    fn options(&self, ttl: Option<Duration>) -> EntryOptions {
        EntryOptions {
            ttl: Some(ttl.unwrap_or(self.default_ttl)),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn backend_name(&self) -> &str {
        self.backend.backend_name()
    }

    /// Get a typed value; `None` on miss or when caching is disabled
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        if !self.enabled {
            return Ok(None);
        }
        let full_key = self.namespaced_key(key);
        match self.backend.get_json(&full_key).await? {
            Some(json) => {
                let value = serde_json::from_str(&json)?;
                debug!(key = %full_key, "cache hit");
                Ok(Some(value))
            }
            None => {
                debug!(key = %full_key, "cache miss");
                Ok(None)
            }
        }
    }

    /// Store a typed value; no-op when caching is disabled
    pub async fn set<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl: Option<Duration>,
    ) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        let full_key = self.namespaced_key(key);
        let json = serde_json::to_string(value)?;
        self.backend
            .set_json(&full_key, &json, self.options(ttl))
            .await
    }

    /// Return the cached value for `key`, storing `value` first when absent.
    ///
    /// The boolean is true when `value` was stored, false when an existing
    /// entry won. With caching disabled the provided value is returned as-is.
    pub async fn get_or_set<T>(&self, key: &str, value: T, ttl: Option<Duration>) -> Result<(T, bool)>
    where
        T: Serialize + DeserializeOwned,
    {
        if !self.enabled {
            return Ok((value, true));
        }
        let full_key = self.namespaced_key(key);
        let json = serde_json::to_string(&value)?;
        let (stored, fresh) = self
            .backend
            .get_or_set_json(&full_key, &json, self.options(ttl))
            .await?;
        if fresh {
            Ok((value, true))
        } else {
            Ok((serde_json::from_str(&stored)?, false))
        }
    }

    /// Remove an entry; returns true when it existed
    pub async fn remove(&self, key: &str) -> Result<bool> {
        if !self.enabled {
            return Ok(false);
        }
        self.backend.delete(&self.namespaced_key(key)).await
    }

    /// Check whether an entry exists
    pub async fn exists(&self, key: &str) -> Result<bool> {
        if !self.enabled {
            return Ok(false);
        }
        self.backend.exists(&self.namespaced_key(key)).await
    }

    /// Clear every entry under this adapter's namespace
    pub async fn clear(&self) -> Result<()> {
        let prefix = format!("{}{}", self.namespace, KEY_SEPARATOR);
        self.backend.clear(Some(&prefix)).await
    }

    pub async fn stats(&self) -> Result<CacheStats> {
        self.backend.stats().await
    }

    pub async fn health(&self) -> Result<HealthStatus> {
        self.backend.health().await
    }
}
