//! Provider trait and types

use crate::search::{SearchFilters, SearchResult};
use async_trait::async_trait;
use std::time::Duration;

/// Result of one provider adapter call
#[derive(Debug, Clone, Default)]
pub struct ProviderResults {
    /// Normalized search results
    pub results: Vec<SearchResult>,
    /// Total hit count hinted by the backend, if known
    pub total_count: Option<u64>,
    /// Adapter-specific metadata, passed through untouched
    pub metadata: Option<serde_json::Value>,
}

impl ProviderResults {
    pub fn new(results: Vec<SearchResult>) -> Self {
        Self {
            total_count: Some(results.len() as u64),
            results,
            metadata: None,
        }
    }

    pub fn with_total_count(mut self, count: u64) -> Self {
        self.total_count = Some(count);
        self
    }
}

/// A search provider adapter.
///
/// Adapters own all backend-specific request/response translation and
/// must hand back results already mapped into [`SearchResult`]; the
/// orchestrator never inspects backend-specific payloads.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Provider name, unique within a registry
    fn name(&self) -> &str;

    /// Priority number; lower is invoked/preferred first
    fn priority(&self) -> u32 {
        100
    }

    /// Per-call timeout for this backend
    fn timeout(&self) -> Duration {
        Duration::from_secs(10)
    }

    /// Execute a search. Any error return is recorded as a per-provider
    /// failure and never aborts the surrounding request.
    async fn search(&self, query: &str, filters: &SearchFilters) -> anyhow::Result<ProviderResults>;
}
