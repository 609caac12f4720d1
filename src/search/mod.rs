//! Search orchestration: models, invocation, aggregation and filtering

mod aggregate;
mod filters;
mod invoker;
mod models;
mod normalize;
mod orchestrator;

pub use aggregate::{aggregate, select_best_provider};
pub use filters::apply_filters;
pub use invoker::{ProviderInvoker, MIN_SEQUENTIAL_RESULTS};
pub use models::{
    OrchestrationResult, ProviderResponse, RecencyWindow, SearchFilters, SearchRequest,
    SearchResult,
};
pub use normalize::{normalize_score, normalize_url};
pub use orchestrator::{Orchestrator, SearchError};
