//! Caching module for MedSearch-RS
//!
//! Keys are a pure function of (query, filters); entry TTLs adapt to the
//! query vocabulary and recency filter. The in-memory store does true LRU
//! eviction tracked by last access time.

use crate::search::{OrchestrationResult, RecencyWindow, SearchFilters};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::debug;

/// Default TTL for cached orchestration results
pub const DEFAULT_TTL: Duration = Duration::from_secs(30 * 60);
/// TTL for queries with time-sensitive vocabulary
pub const TIME_SENSITIVE_TTL: Duration = Duration::from_secs(10 * 60);
/// TTL when the caller filters to the past day or week
pub const RECENT_FILTER_TTL: Duration = Duration::from_secs(15 * 60);
/// TTL when the caller filters to the past month
pub const MONTH_FILTER_TTL: Duration = Duration::from_secs(60 * 60);
/// TTL for stable-knowledge queries
pub const STABLE_TTL: Duration = Duration::from_secs(2 * 60 * 60);

const TIME_SENSITIVE_TERMS: &[&str] = &[
    "breaking", "outbreak", "latest", "today", "recall", "alert", "news",
];

const STABLE_TERMS: &[&str] = &[
    "pathophysiology",
    "guidelines",
    "guideline",
    "diagnosis",
    "anatomy",
    "mechanism",
    "etiology",
];

/// Pick the TTL for a query. Rules are evaluated in a fixed priority
/// order and only the first match applies:
/// time-sensitive vocabulary > recency filter > stable vocabulary > default.
pub fn ttl_for(query: &str, filters: &SearchFilters) -> Duration {
    let lowered = query.to_lowercase();

    if TIME_SENSITIVE_TERMS.iter().any(|t| lowered.contains(t)) {
        return TIME_SENSITIVE_TTL;
    }

    match filters.recency {
        Some(RecencyWindow::PastDay) | Some(RecencyWindow::PastWeek) => {
            return RECENT_FILTER_TTL;
        }
        Some(RecencyWindow::PastMonth) => return MONTH_FILTER_TTL,
        _ => {}
    }

    if STABLE_TERMS.iter().any(|t| lowered.contains(t)) {
        return STABLE_TTL;
    }

    DEFAULT_TTL
}

/// Derive the cache key for a (query, filters) pair.
///
/// The key is independent of the provider subset and execution-strategy
/// flags; set-valued filters are sorted first so element order does not
/// change the key.
pub fn cache_key(query: &str, filters: &SearchFilters) -> String {
    let mut hasher = Sha256::new();
    hasher.update(query.trim().to_lowercase().as_bytes());

    if let Some(ref specialty) = filters.specialty {
        hasher.update(b"specialty:");
        hasher.update(specialty.to_lowercase().as_bytes());
    }

    let mut levels = filters.evidence_levels.clone();
    levels.sort();
    for level in &levels {
        hasher.update(b"evidence:");
        hasher.update(level.as_bytes());
    }

    let mut types = filters.content_types.clone();
    types.sort();
    for content_type in &types {
        hasher.update(b"type:");
        hasher.update(content_type.as_bytes());
    }

    if let Some(recency) = filters.recency {
        hasher.update(b"recency:");
        hasher.update(recency.as_str().as_bytes());
    }

    hasher.update(filters.limit.to_string().as_bytes());
    hasher.update(b":");
    hasher.update(filters.offset.to_string().as_bytes());

    format!("{:x}", hasher.finalize())
}

/// Store for previously computed orchestration results.
///
/// Deployments pick the implementation: `MemoryCache` for a single
/// instance, or an adapter over a shared key-value store when state must
/// span instances. Orchestrator logic is identical either way.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Look up an entry. Expired entries are removed and reported absent.
    async fn get(&self, key: &str) -> Option<OrchestrationResult>;

    /// Insert or overwrite an entry with the given TTL.
    async fn put(&self, key: String, result: OrchestrationResult, ttl: Duration);

    /// Drop every expired entry, returning how many were removed.
    /// Invoked opportunistically rather than from a background task.
    async fn sweep_expired(&self) -> usize;
}

struct CacheEntry {
    result: OrchestrationResult,
    created_at: Instant,
    ttl: Duration,
    last_access: Instant,
    hits: u64,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.created_at) > self.ttl
    }
}

/// In-process cache with per-entry TTL and LRU eviction
pub struct MemoryCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    capacity: usize,
}

impl MemoryCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    /// Number of live entries (expired entries included until swept)
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Access count for an entry, if present
    pub fn hit_count(&self, key: &str) -> Option<u64> {
        self.entries.lock().unwrap().get(key).map(|e| e.hits)
    }

    fn lookup_at(&self, key: &str, now: Instant) -> Option<OrchestrationResult> {
        let mut entries = self.entries.lock().unwrap();
        let expired = match entries.get(key) {
            Some(entry) => entry.is_expired(now),
            None => return None,
        };

        // Remove-then-return so a racing reader never sees a stale entry
        if expired {
            entries.remove(key);
            return None;
        }

        let entry = entries.get_mut(key)?;
        entry.hits += 1;
        entry.last_access = now;
        Some(entry.result.clone())
    }

    fn insert_at(&self, key: String, result: OrchestrationResult, ttl: Duration, now: Instant) {
        let mut entries = self.entries.lock().unwrap();

        if !entries.contains_key(&key) && entries.len() >= self.capacity {
            // Evict the least recently used entry
            if let Some(lru_key) = entries
                .iter()
                .min_by_key(|(_, e)| e.last_access)
                .map(|(k, _)| k.clone())
            {
                debug!("Cache at capacity, evicting {}", lru_key);
                entries.remove(&lru_key);
            }
        }

        entries.insert(
            key,
            CacheEntry {
                result,
                created_at: now,
                ttl,
                last_access: now,
                hits: 0,
            },
        );
    }

    fn sweep_at(&self, now: Instant) -> usize {
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        before - entries.len()
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> Option<OrchestrationResult> {
        self.lookup_at(key, Instant::now())
    }

    async fn put(&self, key: String, result: OrchestrationResult, ttl: Duration) {
        self.insert_at(key, result, ttl, Instant::now());
    }

    async fn sweep_expired(&self) -> usize {
        let removed = self.sweep_at(Instant::now());
        if removed > 0 {
            debug!("Swept {} expired cache entries", removed);
        }
        removed
    }
}
