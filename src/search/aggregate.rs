//! Aggregation: merging, deduplication, ranking and best-provider scoring

use super::models::{ProviderResponse, SearchResult};
use super::normalize::{normalize_score, normalize_url};
use std::collections::HashSet;

/// Maximum points awarded for result count
const COUNT_POINTS: f64 = 40.0;
/// Result count at which the count score saturates
const COUNT_CAP: usize = 10;
/// Maximum points awarded for speed
const SPEED_POINTS: f64 = 30.0;
/// Points lost per second of elapsed time
const SPEED_PENALTY_PER_SEC: f64 = 3.0;
/// Maximum points awarded for mean relevance
const RELEVANCE_POINTS: f64 = 30.0;

/// Merge successful responses into one deduplicated, ranked list.
///
/// Results are concatenated in provider order, deduplicated by
/// normalized URL (first occurrence wins, so provider priority decides
/// ownership of a duplicate), then stably sorted by relevance
/// descending. Returns the unique list and the number of duplicates
/// dropped.
pub fn aggregate(responses: &[ProviderResponse]) -> (Vec<SearchResult>, usize) {
    let mut seen: HashSet<String> = HashSet::new();
    let mut unique: Vec<SearchResult> = Vec::new();
    let mut total_before = 0usize;

    for response in responses.iter().filter(|r| r.success) {
        total_before += response.results.len();
        for result in &response.results {
            if seen.insert(normalize_url(&result.url)) {
                let mut result = result.clone();
                result.relevance_score = normalize_score(result.relevance_score);
                unique.push(result);
            }
        }
    }

    let duplicates_removed = total_before - unique.len();

    // Stable sort keeps provider-priority order for equal scores
    unique.sort_by(|a, b| {
        b.relevance_score
            .partial_cmp(&a.relevance_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    (unique, duplicates_removed)
}

/// Score one provider response for best-provider selection
fn provider_score(response: &ProviderResponse) -> f64 {
    let count = response.results.len().min(COUNT_CAP);
    let count_score = COUNT_POINTS * count as f64 / COUNT_CAP as f64;

    let elapsed_secs = response.time_ms as f64 / 1000.0;
    let speed_score = (SPEED_POINTS - elapsed_secs * SPEED_PENALTY_PER_SEC).max(0.0);

    let mean_relevance = if response.results.is_empty() {
        0.0
    } else {
        response
            .results
            .iter()
            .map(|r| normalize_score(r.relevance_score))
            .sum::<f64>()
            / response.results.len() as f64
    };
    let relevance_score = RELEVANCE_POINTS * mean_relevance;

    count_score + speed_score + relevance_score
}

/// Pick the provider that supplied the highest-quality response.
///
/// Only providers that succeeded with at least one result are eligible;
/// returns `None` when there is no such provider. Responses must be in
/// priority order: ties go to the earlier entry.
pub fn select_best_provider(responses: &[ProviderResponse]) -> Option<String> {
    let mut best: Option<(&ProviderResponse, f64)> = None;

    for response in responses {
        if !response.success || response.results.is_empty() {
            continue;
        }
        let score = provider_score(response);
        // Strictly greater, so the earlier (higher-priority) entry wins ties
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((response, score)),
        }
    }

    best.map(|(response, _)| response.provider.clone())
}
