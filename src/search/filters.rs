//! Post-aggregation filtering and pagination

use super::models::{SearchFilters, SearchResult};

/// Evidence level assumed for results without a tag
const UNKNOWN_LEVEL: &str = "unknown";

/// Apply caller-supplied filters, then the pagination window.
///
/// Evidence-level and content-type sets are exclusionary: a result
/// missing the tag counts as "unknown" and passes only when "unknown"
/// is explicitly accepted. Specialty is a soft filter: untagged results
/// pass. Filtering happens before pagination so the relevance ordering
/// from aggregation is preserved across pages.
pub fn apply_filters(results: Vec<SearchResult>, filters: &SearchFilters) -> Vec<SearchResult> {
    let filtered = results.into_iter().filter(|result| {
        if !filters.evidence_levels.is_empty() {
            let level = result.evidence_level.as_deref().unwrap_or(UNKNOWN_LEVEL);
            if !filters
                .evidence_levels
                .iter()
                .any(|accepted| accepted.eq_ignore_ascii_case(level))
            {
                return false;
            }
        }

        if !filters.content_types.is_empty() {
            let content_type = result.content_type.as_deref().unwrap_or(UNKNOWN_LEVEL);
            if !filters
                .content_types
                .iter()
                .any(|accepted| accepted.eq_ignore_ascii_case(content_type))
            {
                return false;
            }
        }

        if let Some(ref wanted) = filters.specialty {
            if let Some(ref tagged) = result.specialty {
                if !tagged.eq_ignore_ascii_case(wanted) {
                    return false;
                }
            }
            // Untagged results pass the specialty filter
        }

        true
    });

    filtered.skip(filters.offset).take(filters.limit).collect()
}
