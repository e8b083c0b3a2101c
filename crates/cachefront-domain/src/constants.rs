//! Domain-wide constants

/// Default TTL for cache entries (5 minutes)
pub const DEFAULT_TTL_SECS: u64 = 300;

/// Default maximum number of entries held by the memory backend
pub const DEFAULT_MAX_ENTRIES: u64 = 10_000;

/// Default namespace prefixed to every cache key
pub const DEFAULT_NAMESPACE: &str = "cachefront";

/// Separator between namespace and key
pub const KEY_SEPARATOR: char = ':';
