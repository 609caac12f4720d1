//! Search provider abstraction
//!
//! Concrete adapters translate backend-specific wire formats into
//! [`crate::search::SearchResult`] at this boundary and are supplied by
//! the embedding application.

mod registry;
mod traits;

pub use registry::ProviderRegistry;
pub use traits::{ProviderResults, SearchProvider};

#[cfg(test)]
pub(crate) mod testutil {
    //! In-process providers for exercising the orchestration pipeline

    use super::{ProviderResults, SearchProvider};
    use crate::search::{SearchFilters, SearchResult};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Provider returning a canned result list, tracking call counts
    pub struct StaticProvider {
        name: String,
        priority: u32,
        results: Vec<SearchResult>,
        delay: Option<Duration>,
        fail_with: Option<String>,
        pub calls: AtomicUsize,
    }

    impl StaticProvider {
        pub fn new(name: &str, priority: u32, results: Vec<SearchResult>) -> Self {
            Self {
                name: name.to_string(),
                priority,
                results,
                delay: None,
                fail_with: None,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn empty(name: &str, priority: u32) -> Self {
            Self::new(name, priority, vec![])
        }

        /// Provider that always fails with the given error
        pub fn failing(name: &str, priority: u32, error: &str) -> Self {
            let mut provider = Self::empty(name, priority);
            provider.fail_with = Some(error.to_string());
            provider
        }

        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SearchProvider for StaticProvider {
        fn name(&self) -> &str {
            &self.name
        }

        fn priority(&self) -> u32 {
            self.priority
        }

        async fn search(
            &self,
            _query: &str,
            _filters: &SearchFilters,
        ) -> anyhow::Result<ProviderResults> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if let Some(ref error) = self.fail_with {
                anyhow::bail!("{}", error);
            }
            Ok(ProviderResults::new(self.results.clone()))
        }
    }

    /// Build a result with a distinct URL derived from the id
    pub fn result(provider: &str, id: &str, score: f64) -> SearchResult {
        SearchResult::new(
            id,
            format!("Result {}", id),
            format!("https://example.org/{}", id),
            provider,
        )
        .with_score(score)
    }

    /// Build `n` distinct results for a provider
    pub fn results(provider: &str, n: usize) -> Vec<SearchResult> {
        (0..n)
            .map(|i| result(provider, &format!("{}-{}", provider, i), 0.5))
            .collect()
    }
}
