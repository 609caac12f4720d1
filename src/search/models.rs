//! Search request and result data models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Recency window requested by the caller
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RecencyWindow {
    PastDay,
    PastWeek,
    PastMonth,
    PastYear,
}

impl RecencyWindow {
    /// Parse from a query-string value
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "day" | "past_day" => Some(Self::PastDay),
            "week" | "past_week" => Some(Self::PastWeek),
            "month" | "past_month" => Some(Self::PastMonth),
            "year" | "past_year" => Some(Self::PastYear),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PastDay => "past_day",
            Self::PastWeek => "past_week",
            Self::PastMonth => "past_month",
            Self::PastYear => "past_year",
        }
    }
}

/// Post-aggregation filters supplied by the caller
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchFilters {
    /// Medical specialty tag (soft filter: untagged results pass)
    pub specialty: Option<String>,
    /// Accepted evidence levels (empty = no filtering)
    pub evidence_levels: Vec<String>,
    /// Accepted content types (empty = no filtering)
    pub content_types: Vec<String>,
    /// Recency window
    pub recency: Option<RecencyWindow>,
    /// Maximum number of results to return
    pub limit: usize,
    /// Number of results to skip
    pub offset: usize,
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            specialty: None,
            evidence_levels: vec![],
            content_types: vec![],
            recency: None,
            limit: 20,
            offset: 0,
        }
    }
}

/// A search request accepted by the orchestrator. Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    /// The search query string (must be non-empty)
    pub query: String,
    /// Explicit provider subset; `None` means all enabled providers
    #[serde(default)]
    pub providers: Option<Vec<String>>,
    /// Invoke providers concurrently (default) or one at a time
    #[serde(default = "default_true")]
    pub parallel: bool,
    /// Aggregate across providers (default) or keep best provider only
    #[serde(default = "default_true")]
    pub aggregate: bool,
    /// Post-aggregation filters
    #[serde(default)]
    pub filters: SearchFilters,
}

fn default_true() -> bool {
    true
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            providers: None,
            parallel: true,
            aggregate: true,
            filters: SearchFilters::default(),
        }
    }

    /// Restrict the request to an explicit provider subset
    pub fn with_providers(mut self, providers: Vec<String>) -> Self {
        self.providers = Some(providers);
        self
    }

    /// Force the sequential invocation strategy
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Keep only the best provider's results
    pub fn best_only(mut self) -> Self {
        self.aggregate = false;
        self
    }

    pub fn with_filters(mut self, filters: SearchFilters) -> Self {
        self.filters = filters;
        self
    }

    /// Check if the query is empty after trimming
    pub fn is_empty(&self) -> bool {
        self.query.trim().is_empty()
    }
}

/// A single normalized search result produced by a provider adapter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// Provider-assigned identifier
    pub id: String,
    pub title: String,
    pub url: String,
    /// Content snippet/abstract
    pub snippet: String,
    /// Human-readable source label (journal, site name)
    pub source: String,
    /// Name of the provider that returned this result
    pub provider: String,
    /// Relevance score in [0, 1], higher is more relevant
    pub relevance_score: f64,
    /// Evidence level tag (e.g. "rct", "systematic-review")
    pub evidence_level: Option<String>,
    /// Publication date, when known
    pub published_date: Option<DateTime<Utc>>,
    /// Medical specialty tag
    pub specialty: Option<String>,
    /// Content type tag (e.g. "journal-article", "guideline")
    pub content_type: Option<String>,
}

impl SearchResult {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        url: impl Into<String>,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            url: url.into(),
            snippet: String::new(),
            source: String::new(),
            provider: provider.into(),
            relevance_score: 0.0,
            evidence_level: None,
            published_date: None,
            specialty: None,
            content_type: None,
        }
    }

    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = snippet.into();
        self
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.relevance_score = score;
        self
    }

    pub fn with_evidence_level(mut self, level: impl Into<String>) -> Self {
        self.evidence_level = Some(level.into());
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_specialty(mut self, specialty: impl Into<String>) -> Self {
        self.specialty = Some(specialty.into());
        self
    }
}

/// Outcome of one provider invocation. Either `success` with results,
/// or a failure with an error string and an empty result list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderResponse {
    pub provider: String,
    pub success: bool,
    pub results: Vec<SearchResult>,
    /// Total hit count hinted by the provider, when known
    pub total_count: Option<u64>,
    /// Wall-clock time spent on this provider call
    pub time_ms: u64,
    pub error: Option<String>,
    /// Adapter-specific metadata, passed through for observability
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl ProviderResponse {
    /// Build a success response
    pub fn ok(
        provider: impl Into<String>,
        results: Vec<SearchResult>,
        total_count: Option<u64>,
        time_ms: u64,
    ) -> Self {
        Self {
            provider: provider.into(),
            success: true,
            results,
            total_count,
            time_ms,
            error: None,
            metadata: None,
        }
    }

    /// Build a failure response; never carries results
    pub fn failed(provider: impl Into<String>, error: impl Into<String>, time_ms: u64) -> Self {
        Self {
            provider: provider.into(),
            success: false,
            results: vec![],
            total_count: None,
            time_ms,
            error: Some(error.into()),
            metadata: None,
        }
    }
}

/// Final orchestration outcome returned to the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestrationResult {
    /// Deduplicated, ranked, filtered results
    pub results: Vec<SearchResult>,
    /// One entry per invoked provider, in priority order
    pub providers: Vec<ProviderResponse>,
    /// Unique result count after aggregation, before filtering
    pub total_results: usize,
    /// Total wall-clock time for the orchestration
    pub search_time_ms: u64,
    pub query: String,
    /// Results dropped by URL deduplication
    pub duplicates_removed: usize,
    /// Heuristically best provider; absent if every provider failed
    pub best_provider: Option<String>,
    /// Whether this response was served from the cache
    pub cached: bool,
    pub cache_key: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let request = SearchRequest::new("atrial fibrillation");
        assert!(request.parallel);
        assert!(request.aggregate);
        assert!(request.providers.is_none());
        assert_eq!(request.filters.limit, 20);
        assert_eq!(request.filters.offset, 0);
    }

    #[test]
    fn test_request_builder() {
        let request = SearchRequest::new("sepsis")
            .sequential()
            .best_only()
            .with_providers(vec!["pubmed".to_string()]);

        assert!(!request.parallel);
        assert!(!request.aggregate);
        assert_eq!(request.providers.as_deref().unwrap().len(), 1);
    }

    #[test]
    fn test_empty_query_detection() {
        assert!(SearchRequest::new("   ").is_empty());
        assert!(!SearchRequest::new("flu").is_empty());
    }

    #[test]
    fn test_failed_response_has_no_results() {
        let response = ProviderResponse::failed("pubmed", "timeout", 1000);
        assert!(!response.success);
        assert!(response.results.is_empty());
        assert!(response.error.is_some());
    }

    #[test]
    fn test_recency_parse() {
        assert_eq!(RecencyWindow::parse("week"), Some(RecencyWindow::PastWeek));
        assert_eq!(
            RecencyWindow::parse("past_month"),
            Some(RecencyWindow::PastMonth)
        );
        assert_eq!(RecencyWindow::parse("decade"), None);
    }
}
