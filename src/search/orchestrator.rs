//! Top-level search orchestration
//!
//! Owns the request lifecycle: cache lookup, provider invocation,
//! aggregation, classification enhancement, filtering, cache write and
//! the audit side effect. Provider faults are absorbed along the way;
//! only request validation can fail this pipeline.

use super::aggregate::{aggregate, select_best_provider};
use super::filters::apply_filters;
use super::invoker::ProviderInvoker;
use super::models::{OrchestrationResult, SearchRequest};
use crate::audit::{AuditRecord, AuditSink, LogAuditSink};
use crate::cache::{cache_key, ttl_for, CacheStore};
use crate::enhance::ResultClassifier;
use crate::metrics::Metrics;
use crate::providers::ProviderRegistry;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Request-level failure. Everything else is reflected as data inside
/// a well-formed [`OrchestrationResult`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    #[error("query must not be empty")]
    EmptyQuery,
    #[error("no enabled providers match the request")]
    NoProviders,
}

/// Coordinates a search across all enabled providers
pub struct Orchestrator {
    registry: Arc<ProviderRegistry>,
    invoker: ProviderInvoker,
    cache: Arc<dyn CacheStore>,
    classifier: Option<Arc<dyn ResultClassifier>>,
    audit: Arc<dyn AuditSink>,
    metrics: Arc<Metrics>,
}

impl Orchestrator {
    pub fn new(registry: Arc<ProviderRegistry>, cache: Arc<dyn CacheStore>) -> Self {
        Self {
            invoker: ProviderInvoker::new(registry.clone()),
            registry,
            cache,
            classifier: None,
            audit: Arc::new(LogAuditSink),
            metrics: Arc::new(Metrics::new()),
        }
    }

    /// Override the sequential early-stop threshold
    pub fn with_min_sequential_results(mut self, min: usize) -> Self {
        self.invoker = ProviderInvoker::new(self.registry.clone()).with_min_sequential_results(min);
        self
    }

    /// Wire in a classification collaborator
    pub fn with_classifier(mut self, classifier: Arc<dyn ResultClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn with_audit_sink(mut self, audit: Arc<dyn AuditSink>) -> Self {
        self.audit = audit;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    /// Run one search request to completion.
    ///
    /// `caller_id` is an opaque identity used for audit logging only.
    pub async fn orchestrate(
        &self,
        request: &SearchRequest,
        caller_id: &str,
    ) -> Result<OrchestrationResult, SearchError> {
        let start = Instant::now();

        if request.is_empty() {
            return Err(SearchError::EmptyQuery);
        }

        let providers = match &request.providers {
            Some(names) => self.registry.enabled_subset(names),
            None => self.registry.enabled(),
        };
        if providers.is_empty() {
            return Err(SearchError::NoProviders);
        }

        self.metrics.inc_search();

        // Opportunistic expiry sweep instead of a background timer
        self.cache.sweep_expired().await;

        let key = cache_key(&request.query, &request.filters);

        if let Some(mut hit) = self.cache.get(&key).await {
            debug!("Cache hit for '{}'", request.query);
            self.metrics.inc_cache_hit();
            hit.cached = true;
            hit.cache_key = key;
            hit.search_time_ms = start.elapsed().as_millis() as u64;
            self.emit_audit(caller_id, &hit);
            return Ok(hit);
        }

        let responses = self.invoker.invoke(request, &providers).await;
        for response in &responses {
            self.metrics
                .record_provider(&response.provider, response.success, response.time_ms);
        }

        let (mut unique, duplicates_removed) = aggregate(&responses);

        if let Some(ref classifier) = self.classifier {
            if let Err(e) = classifier.classify(&request.query, &mut unique).await {
                // Degrade gracefully: results pass through untagged
                warn!("Classifier unavailable, skipping enhancement: {}", e);
            }
        }

        let best_provider = select_best_provider(&responses);

        if !request.aggregate {
            if let Some(ref best) = best_provider {
                unique.retain(|r| &r.provider == best);
            }
        }

        let total_results = unique.len();
        let results = apply_filters(unique, &request.filters);

        let result = OrchestrationResult {
            results,
            providers: responses,
            total_results,
            search_time_ms: start.elapsed().as_millis() as u64,
            query: request.query.clone(),
            duplicates_removed,
            best_provider,
            cached: false,
            cache_key: key.clone(),
        };

        info!(
            "Search '{}' returned {} results from {} providers in {}ms",
            request.query,
            result.results.len(),
            result.providers.len(),
            result.search_time_ms
        );

        if !result.results.is_empty() {
            let ttl = ttl_for(&request.query, &request.filters);
            self.cache.put(key, result.clone(), ttl).await;
        }

        self.emit_audit(caller_id, &result);

        Ok(result)
    }

    /// Fire-and-forget audit write; a failing sink never fails the request
    fn emit_audit(&self, caller_id: &str, result: &OrchestrationResult) {
        let record = AuditRecord::new(
            caller_id,
            result.query.clone(),
            result.providers.iter().map(|p| p.provider.clone()).collect(),
            result.results.len(),
            result.search_time_ms,
            result.cached,
        );
        let sink = self.audit.clone();
        tokio::spawn(async move {
            if let Err(e) = sink.record(record).await {
                warn!("Audit write failed: {}", e);
            }
        });
    }
}
