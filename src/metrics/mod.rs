//! Metrics collection module
//!
//! Tracks provider performance, error rates and cache effectiveness.
//! Everything lives in process memory; nothing here is persisted.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

/// Global metrics collector
pub struct Metrics {
    /// Total orchestrated searches
    pub total_searches: AtomicU64,
    /// Searches answered from the cache
    pub cache_hits: AtomicU64,
    /// Provider response times (rolling window, ms)
    provider_response_times: RwLock<HashMap<String, Vec<u64>>>,
    /// Provider error counts
    provider_errors: RwLock<HashMap<String, u64>>,
    /// Provider success counts
    provider_successes: RwLock<HashMap<String, u64>>,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            total_searches: AtomicU64::new(0),
            cache_hits: AtomicU64::new(0),
            provider_response_times: RwLock::new(HashMap::new()),
            provider_errors: RwLock::new(HashMap::new()),
            provider_successes: RwLock::new(HashMap::new()),
        }
    }

    pub fn inc_search(&self) {
        self.total_searches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one provider outcome
    pub fn record_provider(&self, provider: &str, success: bool, time_ms: u64) {
        {
            let mut times = self.provider_response_times.write().unwrap();
            let entry = times.entry(provider.to_string()).or_default();
            // Keep last 100 response times
            if entry.len() >= 100 {
                entry.remove(0);
            }
            entry.push(time_ms);
        }

        let map = if success {
            &self.provider_successes
        } else {
            &self.provider_errors
        };
        let mut counts = map.write().unwrap();
        *counts.entry(provider.to_string()).or_insert(0) += 1;
    }

    pub fn get_total_searches(&self) -> u64 {
        self.total_searches.load(Ordering::Relaxed)
    }

    pub fn get_cache_hits(&self) -> u64 {
        self.cache_hits.load(Ordering::Relaxed)
    }

    /// Average response time for a provider over the rolling window
    pub fn get_avg_response_time(&self, provider: &str) -> Option<u64> {
        let times = self.provider_response_times.read().unwrap();
        times.get(provider).and_then(|t| {
            if t.is_empty() {
                None
            } else {
                Some(t.iter().sum::<u64>() / t.len() as u64)
            }
        })
    }

    /// Success percentage for a provider
    pub fn get_reliability(&self, provider: &str) -> f64 {
        let errors = self.provider_errors.read().unwrap();
        let successes = self.provider_successes.read().unwrap();

        let error_count = *errors.get(provider).unwrap_or(&0);
        let success_count = *successes.get(provider).unwrap_or(&0);

        let total = error_count + success_count;
        if total == 0 {
            100.0
        } else {
            (success_count as f64 / total as f64) * 100.0
        }
    }

    /// Per-provider statistics snapshot
    pub fn get_provider_stats(&self) -> HashMap<String, ProviderStats> {
        let times = self.provider_response_times.read().unwrap();
        let mut stats = HashMap::new();

        for provider in times.keys() {
            stats.insert(
                provider.clone(),
                ProviderStats {
                    avg_response_time: self.get_avg_response_time(provider),
                    reliability: self.get_reliability(provider),
                },
            );
        }

        stats
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics for a single provider
#[derive(Debug, Clone, serde::Serialize)]
pub struct ProviderStats {
    pub avg_response_time: Option<u64>,
    pub reliability: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics() {
        let metrics = Metrics::new();

        metrics.inc_search();
        metrics.inc_cache_hit();
        metrics.record_provider("pubmed", true, 100);
        metrics.record_provider("pubmed", false, 500);

        assert_eq!(metrics.get_total_searches(), 1);
        assert_eq!(metrics.get_cache_hits(), 1);
        assert_eq!(metrics.get_avg_response_time("pubmed"), Some(300));
        assert_eq!(metrics.get_reliability("pubmed"), 50.0);
    }
}
