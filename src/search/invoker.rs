//! Provider invocation strategies
//!
//! Issues one bounded-time call per enabled provider, either fanned out
//! concurrently or one at a time in priority order. Every fault becomes a
//! failure entry in the returned list; nothing here ever propagates a
//! provider error to the caller.

use super::models::{ProviderResponse, SearchRequest};
use crate::providers::{ProviderRegistry, SearchProvider};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Instant;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// A sequential pass stops early once a provider returns this many results
pub const MIN_SEQUENTIAL_RESULTS: usize = 5;

/// Executes provider calls for the orchestrator
pub struct ProviderInvoker {
    registry: Arc<ProviderRegistry>,
    min_sequential_results: usize,
}

impl ProviderInvoker {
    pub fn new(registry: Arc<ProviderRegistry>) -> Self {
        Self {
            registry,
            min_sequential_results: MIN_SEQUENTIAL_RESULTS,
        }
    }

    /// Override the sequential early-stop threshold
    pub fn with_min_sequential_results(mut self, min: usize) -> Self {
        self.min_sequential_results = min;
        self
    }

    /// Invoke the given providers for a request.
    ///
    /// Providers must already be sorted by ascending priority; the
    /// returned responses preserve that order regardless of completion
    /// order. Parallel is used when the request allows it and at least
    /// two providers are enabled.
    pub async fn invoke(
        &self,
        request: &SearchRequest,
        providers: &[Arc<dyn SearchProvider>],
    ) -> Vec<ProviderResponse> {
        if request.parallel && providers.len() >= 2 {
            self.invoke_parallel(request, providers).await
        } else {
            self.invoke_sequential(request, providers).await
        }
    }

    /// Fan out one call per provider and wait for all of them to settle.
    /// Never short-circuits: a fast provider does not discard a slow one.
    async fn invoke_parallel(
        &self,
        request: &SearchRequest,
        providers: &[Arc<dyn SearchProvider>],
    ) -> Vec<ProviderResponse> {
        info!(
            "Invoking {} providers in parallel for '{}'",
            providers.len(),
            request.query
        );

        let futures: Vec<_> = providers
            .iter()
            .map(|provider| self.call_provider(provider.clone(), request))
            .collect();

        // join_all yields responses in launch order, i.e. priority order
        join_all(futures).await
    }

    /// Call providers one at a time in priority order, stopping once one
    /// succeeds with enough results.
    async fn invoke_sequential(
        &self,
        request: &SearchRequest,
        providers: &[Arc<dyn SearchProvider>],
    ) -> Vec<ProviderResponse> {
        info!(
            "Invoking {} providers sequentially for '{}'",
            providers.len(),
            request.query
        );

        let mut responses = Vec::new();
        for provider in providers {
            let response = self.call_provider(provider.clone(), request).await;
            let good_enough =
                response.success && response.results.len() >= self.min_sequential_results;
            responses.push(response);

            if good_enough {
                debug!(
                    "Provider {} returned enough results, skipping the rest",
                    provider.name()
                );
                break;
            }
        }
        responses
    }

    /// One bounded-time provider call. Timeouts and adapter errors are
    /// converted into failure responses locally.
    async fn call_provider(
        &self,
        provider: Arc<dyn SearchProvider>,
        request: &SearchRequest,
    ) -> ProviderResponse {
        let name = provider.name().to_string();
        let call_timeout = self.registry.get_timeout(&name);
        let start = Instant::now();

        debug!("Searching provider {} with timeout {:?}", name, call_timeout);

        let outcome = timeout(
            call_timeout,
            provider.search(&request.query, &request.filters),
        )
        .await;

        let elapsed_ms = start.elapsed().as_millis() as u64;

        match outcome {
            Ok(Ok(provider_results)) => {
                debug!(
                    "Provider {} returned {} results in {}ms",
                    name,
                    provider_results.results.len(),
                    elapsed_ms
                );
                let mut response = ProviderResponse::ok(
                    name,
                    provider_results.results,
                    provider_results.total_count,
                    elapsed_ms,
                );
                response.metadata = provider_results.metadata;
                response
            }
            Ok(Err(e)) => {
                warn!("Provider {} failed: {}", name, e);
                ProviderResponse::failed(name, e.to_string(), elapsed_ms)
            }
            Err(_) => {
                warn!("Provider {} timed out after {:?}", name, call_timeout);
                ProviderResponse::failed(
                    name,
                    format!("timed out after {:?}", call_timeout),
                    elapsed_ms,
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderConfig;
    use crate::providers::testutil::{results, StaticProvider};
    use std::time::Duration;

    fn registry_with(providers: &[Arc<StaticProvider>]) -> Arc<ProviderRegistry> {
        let mut registry = ProviderRegistry::new();
        for provider in providers {
            registry.register_default(provider.clone() as Arc<dyn SearchProvider>);
        }
        Arc::new(registry)
    }

    #[tokio::test]
    async fn test_parallel_preserves_priority_order() {
        let p1 = Arc::new(
            StaticProvider::new("p1", 1, results("p1", 2))
                .with_delay(Duration::from_millis(50)),
        );
        let p2 = Arc::new(StaticProvider::new("p2", 2, results("p2", 2)));
        let registry = registry_with(&[p1.clone(), p2.clone()]);
        let invoker = ProviderInvoker::new(registry.clone());

        let request = SearchRequest::new("flu");
        let providers = registry.enabled();
        let responses = invoker.invoke(&request, &providers).await;

        // p2 finished first but p1 still comes back first
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0].provider, "p1");
        assert_eq!(responses[1].provider, "p2");
    }

    #[tokio::test]
    async fn test_parallel_never_short_circuits() {
        let fast = Arc::new(StaticProvider::new("fast", 1, results("fast", 10)));
        let slow = Arc::new(
            StaticProvider::new("slow", 2, results("slow", 3))
                .with_delay(Duration::from_millis(30)),
        );
        let registry = registry_with(&[fast.clone(), slow.clone()]);
        let invoker = ProviderInvoker::new(registry.clone());

        let responses = invoker
            .invoke(&SearchRequest::new("flu"), &registry.enabled())
            .await;

        assert_eq!(responses.len(), 2);
        assert!(responses.iter().all(|r| r.success));
        assert_eq!(slow.call_count(), 1);
    }

    #[tokio::test]
    async fn test_failure_becomes_response_entry() {
        let good = Arc::new(StaticProvider::new("good", 1, results("good", 2)));
        let bad = Arc::new(StaticProvider::failing("bad", 2, "upstream 500"));
        let registry = registry_with(&[good, bad]);
        let invoker = ProviderInvoker::new(registry.clone());

        let responses = invoker
            .invoke(&SearchRequest::new("flu"), &registry.enabled())
            .await;

        assert_eq!(responses.len(), 2);
        assert!(responses[0].success);
        assert!(!responses[1].success);
        assert!(responses[1].error.as_deref().unwrap().contains("upstream 500"));
        assert!(responses[1].results.is_empty());
    }

    #[tokio::test]
    async fn test_timeout_becomes_failure() {
        let slow = Arc::new(
            StaticProvider::new("slow", 1, results("slow", 2))
                .with_delay(Duration::from_secs(5)),
        );
        let other = Arc::new(StaticProvider::new("other", 2, results("other", 1)));

        let mut registry = ProviderRegistry::new();
        registry.register(
            slow.clone() as Arc<dyn SearchProvider>,
            ProviderConfig {
                name: "slow".to_string(),
                timeout_secs: Some(0.05),
                ..Default::default()
            },
        );
        registry.register_default(other as Arc<dyn SearchProvider>);
        let registry = Arc::new(registry);
        let invoker = ProviderInvoker::new(registry.clone());

        let responses = invoker
            .invoke(&SearchRequest::new("flu"), &registry.enabled())
            .await;

        let slow_response = responses.iter().find(|r| r.provider == "slow").unwrap();
        assert!(!slow_response.success);
        assert!(slow_response.error.as_deref().unwrap().contains("timed out"));
        // Sibling call is unaffected by the timeout
        let other_response = responses.iter().find(|r| r.provider == "other").unwrap();
        assert!(other_response.success);
    }

    #[tokio::test]
    async fn test_sequential_early_stop() {
        let p1 = Arc::new(StaticProvider::new("p1", 1, results("p1", 6)));
        let p2 = Arc::new(StaticProvider::new("p2", 2, results("p2", 6)));
        let p3 = Arc::new(StaticProvider::new("p3", 3, results("p3", 6)));
        let registry = registry_with(&[p1.clone(), p2.clone(), p3.clone()]);
        let invoker = ProviderInvoker::new(registry.clone());

        let request = SearchRequest::new("flu").sequential();
        let responses = invoker.invoke(&request, &registry.enabled()).await;

        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0].provider, "p1");
        assert_eq!(p1.call_count(), 1);
        assert_eq!(p2.call_count(), 0);
        assert_eq!(p3.call_count(), 0);
    }

    #[tokio::test]
    async fn test_sequential_continues_past_thin_results() {
        let thin = Arc::new(StaticProvider::new("thin", 1, results("thin", 2)));
        let failing = Arc::new(StaticProvider::failing("broken", 2, "boom"));
        let full = Arc::new(StaticProvider::new("full", 3, results("full", 5)));
        let registry = registry_with(&[thin.clone(), failing.clone(), full.clone()]);
        let invoker = ProviderInvoker::new(registry.clone());

        let request = SearchRequest::new("flu").sequential();
        let responses = invoker.invoke(&request, &registry.enabled()).await;

        assert_eq!(responses.len(), 3);
        assert_eq!(full.call_count(), 1);
    }

    #[tokio::test]
    async fn test_single_provider_runs_sequentially() {
        let only = Arc::new(StaticProvider::new("only", 1, results("only", 1)));
        let registry = registry_with(&[only.clone()]);
        let invoker = ProviderInvoker::new(registry.clone());

        // parallel flag set, but one provider means a plain direct call
        let responses = invoker
            .invoke(&SearchRequest::new("flu"), &registry.enabled())
            .await;
        assert_eq!(responses.len(), 1);
        assert!(responses[0].success);
    }
}
