//! Result normalization: URL canonicalization and score repair

use url::Url;

/// Canonicalize a URL for deduplication.
///
/// Lower-cases scheme, host and path, strips query string and fragment,
/// and removes trailing-slash variation so that
/// `https://Example.com/A/?utm=1` and `http://example.com/a` collide.
pub fn normalize_url(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(parsed) => {
            let host = parsed.host_str().unwrap_or_default().to_lowercase();
            let host = host.strip_prefix("www.").unwrap_or(&host).to_string();
            let path = parsed.path().trim_end_matches('/').to_lowercase();
            format!("{}{}", host, path)
        }
        // Not a parseable URL; fall back to string normalization.
        // Query/fragment come off before the trailing slash so
        // "/page/?q=1" and "/page" collide.
        Err(_) => raw
            .trim()
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_start_matches("www.")
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim_end_matches('/')
            .to_lowercase(),
    }
}

/// Repair a relevance score into [0, 1]. NaN and negative values
/// collapse to 0, values above 1 clamp to 1.
pub fn normalize_score(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_and_case() {
        assert_eq!(
            normalize_url("https://Example.com/Path/"),
            normalize_url("https://example.com/path")
        );
    }

    #[test]
    fn test_scheme_and_www_ignored() {
        assert_eq!(
            normalize_url("http://www.example.com/a"),
            normalize_url("https://example.com/a")
        );
    }

    #[test]
    fn test_query_string_stripped() {
        assert_eq!(
            normalize_url("https://example.com/a?utm_source=x&b=2"),
            normalize_url("https://example.com/a")
        );
    }

    #[test]
    fn test_unparseable_fallback() {
        assert_eq!(normalize_url("Example.com/Page/?q=1"), "example.com/page");
    }

    #[test]
    fn test_fallback_trailing_slash_with_query() {
        // A query string must not shield the trailing slash from removal
        assert_eq!(
            normalize_url("Example.com/Page/?q=1"),
            normalize_url("Example.com/Page")
        );
        assert_eq!(
            normalize_url("example.com/page/#section"),
            normalize_url("example.com/page")
        );
    }

    #[test]
    fn test_distinct_paths_stay_distinct() {
        assert_ne!(
            normalize_url("https://example.com/a"),
            normalize_url("https://example.com/b")
        );
    }

    #[test]
    fn test_score_repair() {
        assert_eq!(normalize_score(f64::NAN), 0.0);
        assert_eq!(normalize_score(-0.3), 0.0);
        assert_eq!(normalize_score(1.7), 1.0);
        assert_eq!(normalize_score(0.42), 0.42);
    }
}
