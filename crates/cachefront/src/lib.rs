//! # Cachefront
//!
//! A thin caching facade over an in-process memory cache and Redis,
//! exposed over HTTP.
//!
//! The facade runs in one of two modes, chosen at startup from
//! configuration:
//!
//! - **Local**: entries live in an in-process cache with per-entry TTL
//!   and bounded capacity. No external services are required.
//! - **Remote**: entries live in Redis, and the full delegated Redis
//!   surface (strings, hashes, lists, sets, sorted sets, key management)
//!   is exposed under `/redis`.
//!
//! ## Example
//!
//! ```ignore
//! use cachefront::infrastructure::cache::{build_cache, CacheAdapter};
//! use cachefront::infrastructure::config::CacheSettings;
//!
//! let settings = CacheSettings::default();
//! let (cache, _redis) = build_cache(&settings).await?;
//! cache.set("greeting", &"hello", None).await?;
//! ```

/// Domain types: the cache port, entry options, stats, and errors
pub mod domain {
    pub use cachefront_domain::*;
}

/// Infrastructure: backends, configuration, and logging
pub mod infrastructure {
    pub use cachefront_infrastructure::*;
}

/// HTTP server assembly and entry point
pub mod server {
    pub use cachefront_server::*;
}

pub use cachefront_server::run;
