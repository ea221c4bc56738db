// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod cache;
pub mod config;
pub mod consolidate;
pub mod enrich;
pub mod error;
pub mod generate;
pub mod keywords;
pub mod metrics;
pub mod model;
pub mod orchestrator;
pub mod retry;
pub mod settle;
pub mod sources;
pub mod themes;

// ---- Re-exports for stable public API ----
pub use crate::api::{create_router, AppState};
pub use crate::model::{Hashtag, SourceName, Theme, TrendSnapshot};

/// Build the same router the binary serves, wired from the environment.
/// Handy for router-level tests and embedding.
pub fn app() -> axum::Router {
    create_router(AppState::from_env())
}
