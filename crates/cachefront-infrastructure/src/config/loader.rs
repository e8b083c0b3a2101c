//! Configuration loader
//!
//! Handles loading configuration from TOML files, environment variables,
//! and default values, merged with figment.

use crate::config::{
    AppConfig, CONFIG_ENV_PREFIX, DEFAULT_CONFIG_DIR, DEFAULT_CONFIG_FILENAME,
};
use crate::logging::{log_config_loaded, parse_log_level};
use cachefront_domain::error::{Error, Result};
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use std::env;
use std::path::{Path, PathBuf};

/// Configuration loader service
#[derive(Clone)]
pub struct ConfigLoader {
    /// Configuration file path
    config_path: Option<PathBuf>,

    /// Environment prefix
    env_prefix: String,
}

impl ConfigLoader {
    /// Create a new configuration loader with default settings
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: CONFIG_ENV_PREFIX.to_string(),
        }
    }

    /// Set the configuration file path
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the environment variable prefix
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Load configuration from all sources
    ///
    /// Configuration sources are merged in this order (later sources
    /// override earlier):
    /// 1. Default values from `AppConfig::default()`
    /// 2. TOML configuration file (if it exists)
    /// 3. Environment variables with prefix (e.g. `CACHEFRONT_SERVER_PORT`)
    pub fn load(&self) -> Result<AppConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

        if let Some(config_path) = &self.config_path {
            if config_path.exists() {
                figment = figment.merge(Toml::file(config_path));
                log_config_loaded(config_path, true);
            } else {
                log_config_loaded(config_path, false);
            }
        } else if let Some(default_path) = Self::find_default_config_path() {
            if default_path.exists() {
                figment = figment.merge(Toml::file(&default_path));
                log_config_loaded(&default_path, true);
            }
        }

        // Uses underscore as separator for nested keys (e.g. CACHEFRONT_SERVER_PORT)
        figment = figment.merge(Env::prefixed(&format!("{}_", self.env_prefix)).split("_"));

        let app_config: AppConfig = figment
            .extract()
            .map_err(|e| Error::config(format!("failed to extract configuration: {}", e)))?;

        self.validate_config(&app_config)?;

        Ok(app_config)
    }

    /// Get the current configuration file path
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Find the default configuration file, if any
    fn find_default_config_path() -> Option<PathBuf> {
        let current_dir = env::current_dir().ok()?;

        let candidates = [
            Some(current_dir.join(DEFAULT_CONFIG_FILENAME)),
            Some(
                current_dir
                    .join(DEFAULT_CONFIG_DIR)
                    .join(DEFAULT_CONFIG_FILENAME),
            ),
            dirs::config_dir().map(|d| d.join(DEFAULT_CONFIG_DIR).join(DEFAULT_CONFIG_FILENAME)),
            dirs::home_dir().map(|d| {
                d.join(format!(".{}", DEFAULT_CONFIG_DIR))
                    .join(DEFAULT_CONFIG_FILENAME)
            }),
        ];

        candidates.into_iter().flatten().find(|path| path.exists())
    }

    /// Validate a loaded configuration
    fn validate_config(&self, config: &AppConfig) -> Result<()> {
        if config.server.port == 0 {
            return Err(Error::config("server port must be non-zero"));
        }

        if config.cache.default_ttl_secs == 0 {
            return Err(Error::config("cache default TTL must be non-zero"));
        }

        if config.cache.namespace.is_empty() {
            return Err(Error::config("cache namespace must not be empty"));
        }

        if let Some(url) = &config.cache.redis_url {
            if url.is_empty() {
                return Err(Error::config("redis_url must not be an empty string"));
            }

            // The database index is appended as the URL path, so the URL
            // itself must not already carry one
            if config.cache.redis_database != 0 {
                let has_db_path = url
                    .splitn(2, "://")
                    .nth(1)
                    .is_some_and(|rest| rest.contains('/'));
                if has_db_path {
                    return Err(Error::config(
                        "redis_url must not contain a database path when redis_database is set",
                    ));
                }
            }
        }

        parse_log_level(&config.logging.level)?;

        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
