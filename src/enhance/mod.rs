//! Result classification enhancement
//!
//! An optional collaborator that fills in evidence-level, content-type
//! and specialty tags after aggregation. Only those three fields may be
//! touched; id, url and provider are never modified. When the
//! collaborator is unavailable or fails, results pass through unchanged.

use crate::search::SearchResult;
use async_trait::async_trait;

/// Classification collaborator
#[async_trait]
pub trait ResultClassifier: Send + Sync {
    /// Populate or correct classification tags in place
    async fn classify(&self, query: &str, results: &mut [SearchResult]) -> anyhow::Result<()>;
}

/// Keyword-based classifier used when no external classifier is wired in
pub struct KeywordClassifier;

const EVIDENCE_RULES: &[(&str, &str)] = &[
    ("meta-analysis", "systematic-review"),
    ("systematic review", "systematic-review"),
    ("randomized", "rct"),
    ("randomised", "rct"),
    ("cohort", "cohort"),
    ("case report", "case-report"),
    ("case series", "case-series"),
];

const CONTENT_RULES: &[(&str, &str)] = &[
    ("guideline", "guideline"),
    ("consensus statement", "guideline"),
    ("review", "review"),
    ("trial", "journal-article"),
    ("study", "journal-article"),
];

const SPECIALTY_RULES: &[(&str, &str)] = &[
    ("cardiac", "cardiology"),
    ("cardiovascular", "cardiology"),
    ("atrial", "cardiology"),
    ("oncolog", "oncology"),
    ("tumor", "oncology"),
    ("neurolog", "neurology"),
    ("stroke", "neurology"),
    ("pediatric", "pediatrics"),
    ("psychiatr", "psychiatry"),
    ("dermatolog", "dermatology"),
];

impl KeywordClassifier {
    fn match_rules(text: &str, rules: &[(&str, &str)]) -> Option<String> {
        rules
            .iter()
            .find(|(keyword, _)| text.contains(keyword))
            .map(|(_, tag)| (*tag).to_string())
    }
}

#[async_trait]
impl ResultClassifier for KeywordClassifier {
    async fn classify(&self, query: &str, results: &mut [SearchResult]) -> anyhow::Result<()> {
        let query_lowered = query.to_lowercase();
        for result in results.iter_mut() {
            let text = format!("{} {}", result.title, result.snippet).to_lowercase();

            if result.evidence_level.is_none() {
                result.evidence_level = Self::match_rules(&text, EVIDENCE_RULES);
            }
            if result.content_type.is_none() {
                result.content_type = Self::match_rules(&text, CONTENT_RULES);
            }
            if result.specialty.is_none() {
                result.specialty = Self::match_rules(&text, SPECIALTY_RULES)
                    .or_else(|| Self::match_rules(&query_lowered, SPECIALTY_RULES));
            }
        }
        Ok(())
    }
}
