//! Audit trail for completed orchestrations
//!
//! One record per request, written fire-and-forget: the orchestrator
//! spawns the write and never waits on it, and a failing sink is logged
//! and swallowed.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tracing::info;
use uuid::Uuid;

/// One audit record per orchestrated search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: Uuid,
    /// Opaque caller identity supplied by the authentication layer
    pub caller_id: String,
    pub query: String,
    /// Providers invoked for this request
    pub providers_used: Vec<String>,
    pub result_count: usize,
    pub search_time_ms: u64,
    pub cache_hit: bool,
    pub timestamp: DateTime<Utc>,
}

impl AuditRecord {
    pub fn new(
        caller_id: impl Into<String>,
        query: impl Into<String>,
        providers_used: Vec<String>,
        result_count: usize,
        search_time_ms: u64,
        cache_hit: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            caller_id: caller_id.into(),
            query: query.into(),
            providers_used,
            result_count,
            search_time_ms,
            cache_hit,
            timestamp: Utc::now(),
        }
    }
}

/// Destination for audit records
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record(&self, record: AuditRecord) -> anyhow::Result<()>;
}

/// Sink that emits records to the tracing log
pub struct LogAuditSink;

#[async_trait]
impl AuditSink for LogAuditSink {
    async fn record(&self, record: AuditRecord) -> anyhow::Result<()> {
        info!(
            caller_id = %record.caller_id,
            query = %record.query,
            providers = ?record.providers_used,
            result_count = record.result_count,
            search_time_ms = record.search_time_ms,
            cache_hit = record.cache_hit,
            "search audit"
        );
        Ok(())
    }
}

/// Sink that collects records in memory; useful in tests and embeddings
#[derive(Default)]
pub struct MemoryAuditSink {
    records: Mutex<Vec<AuditRecord>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl AuditSink for MemoryAuditSink {
    async fn record(&self, record: AuditRecord) -> anyhow::Result<()> {
        self.records.lock().unwrap().push(record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_sink_collects() {
        let sink = MemoryAuditSink::new();
        let record = AuditRecord::new("user-1", "flu", vec!["pubmed".to_string()], 3, 120, false);
        sink.record(record).await.unwrap();

        assert_eq!(sink.len(), 1);
        assert_eq!(sink.records()[0].caller_id, "user-1");
        assert!(!sink.records()[0].cache_hit);
    }
}
