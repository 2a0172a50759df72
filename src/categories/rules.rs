//! Deterministic category rules, tried before the keyword engine
//!
//! Priority: vendor mapping, explanation keywords, OCR keywords, business
//! type default.

use super::mappings::{BUSINESS_TYPE_DEFAULTS, KEYWORD_CATEGORIES, VENDOR_CATEGORIES};
use super::{norm, RuleHit};

/// Longest vendor key contained in `vendor`
pub fn match_vendor(vendor: &str) -> Option<RuleHit> {
    let vendor_norm = norm(vendor);
    if vendor_norm.is_empty() {
        return None;
    }

    let mut best: Option<(&str, &str)> = None;
    for (key, category) in VENDOR_CATEGORIES {
        if !vendor_norm.contains(&norm(key)) {
            continue;
        }
        if best.map_or(true, |(k, _)| key.len() > k.len()) {
            best = Some((key, category));
        }
    }

    best.map(|(key, category)| RuleHit {
        category: category.to_string(),
        confidence: 0.95,
        reasoning: format!("Vendor mapping matched: '{}' in '{}'", key, vendor),
    })
}

/// First keyword, in table order, found in `text`
pub fn match_keywords(text: &str) -> Option<RuleHit> {
    let t = norm(text);
    if t.is_empty() {
        return None;
    }

    KEYWORD_CATEGORIES
        .iter()
        .find(|(kw, _)| t.contains(kw))
        .map(|(kw, category)| RuleHit {
            category: category.to_string(),
            confidence: 0.80,
            reasoning: format!("Keyword mapping matched: '{}'", kw),
        })
}

pub fn match_business_default(business_type: &str) -> Option<RuleHit> {
    let bt = norm(business_type);
    BUSINESS_TYPE_DEFAULTS
        .iter()
        .find(|(key, _)| *key == bt)
        .map(|(_, category)| RuleHit {
            category: category.to_string(),
            confidence: 0.55,
            reasoning: format!("Business type default used: {}", business_type),
        })
}

pub fn apply_rules(
    vendor: Option<&str>,
    explanation: Option<&str>,
    ocr_text: Option<&str>,
    business_type: Option<&str>,
) -> Option<RuleHit> {
    if let Some(hit) = vendor.and_then(match_vendor) {
        return Some(hit);
    }

    if let Some(mut hit) = explanation.and_then(match_keywords) {
        hit.reasoning = format!("Explanation rule: {}", hit.reasoning);
        return Some(hit);
    }

    if let Some(mut hit) = ocr_text.and_then(match_keywords) {
        hit.reasoning = format!("OCR rule: {}", hit.reasoning);
        return Some(hit);
    }

    business_type.and_then(match_business_default)
}
