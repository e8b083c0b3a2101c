//! Configuration types
//!
//! Settings structs deserialized from the layered configuration sources.
//! All types carry serde derives and explicit `Default` impls so that
//! the figment loader can start from serialized defaults.

mod loader;

pub use loader::ConfigLoader;

use cachefront_domain::constants::{DEFAULT_MAX_ENTRIES, DEFAULT_NAMESPACE, DEFAULT_TTL_SECS};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable prefix for configuration overrides
pub const CONFIG_ENV_PREFIX: &str = "CACHEFRONT";

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "cachefront.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "cachefront";

/// Top-level application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerSettings,

    /// Cache backend settings
    #[serde(default)]
    pub cache: CacheSettings,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

/// Cache backend settings
///
/// When `redis_url` is set the facade runs against Redis (remote mode);
/// otherwise it uses the in-process memory backend (local mode).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Cache enabled; when false every operation is a no-op
    pub enabled: bool,

    /// Redis connection URL (e.g. "redis://127.0.0.1:6379")
    pub redis_url: Option<String>,

    /// Redis logical database index
    pub redis_database: u32,

    /// Default TTL in seconds for entries without an explicit TTL
    pub default_ttl_secs: u64,

    /// Maximum number of entries held by the memory backend
    pub max_entries: u64,

    /// Namespace prefixed to every cache key
    pub namespace: String,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            redis_url: None,
            redis_database: 0,
            default_ttl_secs: DEFAULT_TTL_SECS,
            max_entries: DEFAULT_MAX_ENTRIES,
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }
}

impl CacheSettings {
    /// Connection URL with the logical database index applied
    ///
    /// The database index is selected declaratively via the URL path
    /// (`redis://host:port/2`) rather than by switching a shared handle
    /// at runtime. `redis_url` must be path-free when `redis_database`
    /// is nonzero; the config loader rejects the combination.
    pub fn connection_url(&self) -> Option<String> {
        self.redis_url.as_ref().map(|url| {
            if self.redis_database == 0 {
                url.clone()
            } else {
                format!("{}/{}", url.trim_end_matches('/'), self.redis_database)
            }
        })
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, or error
    pub level: String,
    /// Emit JSON-formatted log lines
    pub json_format: bool,
    /// Optional log file path (daily rotation)
    pub file_output: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            file_output: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_settings_default() {
        let settings = CacheSettings::default();
        assert!(settings.enabled);
        assert_eq!(settings.default_ttl_secs, 300);
        assert_eq!(settings.max_entries, 10_000);
        assert!(settings.redis_url.is_none()); // local mode by default
    }

    #[test]
    fn test_connection_url_with_database() {
        let settings = CacheSettings {
            redis_url: Some("redis://127.0.0.1:6379".to_string()),
            redis_database: 3,
            ..Default::default()
        };
        assert_eq!(
            settings.connection_url().unwrap(),
            "redis://127.0.0.1:6379/3"
        );

        let settings = CacheSettings {
            redis_url: Some("redis://127.0.0.1:6379".to_string()),
            redis_database: 0,
            ..Default::default()
        };
        assert_eq!(settings.connection_url().unwrap(), "redis://127.0.0.1:6379");
    }
}
