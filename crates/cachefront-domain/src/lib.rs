//! # Cachefront Domain
//!
//! Core types shared by every layer of the caching facade: the error type,
//! the [`CacheBackend`] port, and the value types that travel with cache
//! operations ([`EntryOptions`], [`CacheStats`], [`HealthStatus`]).
//!
//! This crate is intentionally small and dependency-light. Backend
//! implementations live in `cachefront-infrastructure`; the HTTP surface
//! lives in `cachefront-server`.

pub mod constants;
pub mod error;
pub mod ports;

pub use error::{Error, Result};
pub use ports::{CacheBackend, CacheStats, EntryOptions, HealthStatus};
