//! HTTP request handlers

use super::state::AppState;
use crate::search::{RecencyWindow, SearchFilters, SearchRequest};
use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Caller identity header; defaults to "anonymous" when absent
const CALLER_ID_HEADER: &str = "x-caller-id";

/// Query parameters for GET /search
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Search query
    pub q: Option<String>,
    /// Providers (comma-separated)
    pub providers: Option<String>,
    /// Invoke providers concurrently
    pub parallel: Option<bool>,
    /// Aggregate across providers or keep best only
    pub aggregate: Option<bool>,
    /// Specialty filter
    pub specialty: Option<String>,
    /// Evidence levels (comma-separated)
    pub evidence: Option<String>,
    /// Content types (comma-separated)
    pub content: Option<String>,
    /// Recency window (day/week/month/year)
    pub recency: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ProviderInfo {
    pub name: String,
    pub priority: u32,
    pub timeout_secs: f64,
}

fn split_csv(value: &Option<String>) -> Vec<String> {
    value
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn caller_id(headers: &HeaderMap) -> String {
    headers
        .get(CALLER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("anonymous")
        .to_string()
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

impl SearchParams {
    fn into_request(self) -> SearchRequest {
        let providers = split_csv(&self.providers);
        let filters = SearchFilters {
            specialty: self.specialty,
            evidence_levels: split_csv(&self.evidence),
            content_types: split_csv(&self.content),
            recency: self.recency.as_deref().and_then(RecencyWindow::parse),
            limit: self.limit.unwrap_or(20),
            offset: self.offset.unwrap_or(0),
        };

        let mut request = SearchRequest::new(self.q.unwrap_or_default()).with_filters(filters);
        if !providers.is_empty() {
            request = request.with_providers(providers);
        }
        request.parallel = self.parallel.unwrap_or(true);
        request.aggregate = self.aggregate.unwrap_or(true);
        request
    }
}

/// GET /search
pub async fn search(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<SearchParams>,
) -> Response {
    let request = params.into_request();
    run_search(state, headers, request).await
}

/// POST /search with a full request body
pub async fn search_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<SearchRequest>,
) -> Response {
    run_search(state, headers, request).await
}

async fn run_search(state: AppState, headers: HeaderMap, request: SearchRequest) -> Response {
    let caller = caller_id(&headers);
    match state.orchestrator.orchestrate(&request, &caller).await {
        Ok(result) => Json(result).into_response(),
        // Validation errors are the only request-level failures
        Err(e) => error_response(StatusCode::BAD_REQUEST, e.to_string()),
    }
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "instance": state.instance_name(),
        "version": crate::VERSION,
        "providers": state.registry.len(),
    }))
}

/// GET /providers
pub async fn providers(State(state): State<AppState>) -> impl IntoResponse {
    let mut infos: Vec<ProviderInfo> = state
        .registry
        .enabled()
        .iter()
        .map(|p| ProviderInfo {
            name: p.name().to_string(),
            priority: state.registry.get_priority(p.name()),
            timeout_secs: state.registry.get_timeout(p.name()).as_secs_f64(),
        })
        .collect();
    infos.sort_by_key(|i| i.priority);
    Json(infos)
}

/// GET /stats
pub async fn stats(State(state): State<AppState>) -> impl IntoResponse {
    let metrics = state.orchestrator.metrics();
    Json(json!({
        "total_searches": metrics.get_total_searches(),
        "cache_hits": metrics.get_cache_hits(),
        "providers": metrics.get_provider_stats(),
    }))
}
