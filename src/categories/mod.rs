//! Bookkeeping category suggestion
//!
//! Deterministic rules run first; the keyword engine is the fallback. Both
//! report confidence in 0..1.

mod engine;
mod mappings;
mod rules;

pub use engine::{suggest_category, BUSINESS_TYPE_HINTS, KEYWORDS};
pub use mappings::{BUSINESS_TYPE_DEFAULTS, KEYWORD_CATEGORIES, VENDOR_CATEGORIES};
pub use rules::apply_rules;

use serde::{Deserialize, Serialize};

/// A single rule or engine match
#[derive(Debug, Clone, PartialEq)]
pub struct RuleHit {
    pub category: String,
    pub confidence: f64,
    pub reasoning: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategorySource {
    Rules,
    Engine,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySuggestion {
    pub category: Option<String>,
    pub confidence: f64,
    pub reasoning: String,
    pub source: CategorySource,
}

/// Lowercase, trimmed, whitespace collapsed
pub(crate) fn norm(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

pub fn categorize_purchase(
    vendor: Option<&str>,
    ocr_text: Option<&str>,
    explanation: Option<&str>,
    business_type: Option<&str>,
) -> CategorySuggestion {
    if let Some(hit) = apply_rules(vendor, explanation, ocr_text, business_type) {
        return CategorySuggestion {
            category: Some(hit.category),
            confidence: hit.confidence,
            reasoning: hit.reasoning,
            source: CategorySource::Rules,
        };
    }

    match suggest_category(vendor, ocr_text, explanation, business_type) {
        Some(hit) => CategorySuggestion {
            category: Some(hit.category),
            confidence: hit.confidence,
            reasoning: hit.reasoning,
            source: CategorySource::Engine,
        },
        None => CategorySuggestion {
            category: None,
            confidence: 0.0,
            reasoning: "No category match found".to_string(),
            source: CategorySource::Engine,
        },
    }
}
