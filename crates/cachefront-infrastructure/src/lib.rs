//! # Cachefront Infrastructure
//!
//! Cross-cutting technical concerns for the caching facade:
//!
//! - **config**: layered configuration (defaults, TOML file, environment)
//! - **logging**: structured logging with the tracing ecosystem
//! - **cache**: the memory and Redis backends plus the typed adapter

pub mod cache;
pub mod config;
pub mod logging;

pub use cache::{build_cache, CacheAdapter, MemoryCache, RedisCache};
pub use config::{AppConfig, CacheSettings, ConfigLoader, LoggingConfig, ServerSettings};
