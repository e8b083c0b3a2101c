//! HTTP server for the cachefront caching facade
//!
//! Exposes the memory/Redis cache adapter under `/cache`, the delegated
//! Redis surface under `/redis`, and operational probes at the root.

pub mod handlers;
pub mod server;
pub mod state;

pub use server::{build_rocket, run};
pub use state::AppState;
