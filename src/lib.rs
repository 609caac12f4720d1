//! MedSearch-RS: a multi-provider medical search orchestrator
//!
//! Fans a query out to independent search providers with per-provider
//! timeouts, aggregates and deduplicates the combined results, scores a
//! best provider, applies caller filters and caches the outcome under a
//! content-derived key with adaptive TTL.

pub mod audit;
pub mod cache;
pub mod config;
pub mod enhance;
pub mod metrics;
pub mod providers;
pub mod search;
pub mod web;

pub use cache::{CacheStore, MemoryCache};
pub use config::Settings;
pub use providers::{ProviderRegistry, SearchProvider};
pub use search::{OrchestrationResult, Orchestrator, SearchRequest, SearchResult};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default per-provider timeout in seconds
pub const DEFAULT_TIMEOUT: u64 = 10;
