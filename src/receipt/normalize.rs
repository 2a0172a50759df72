//! Normalization of parsed receipts into the canonical review surface

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer};

use super::types::{ReceiptNormalized, ReceiptParsed};

static MONEY_2DP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\$?\d{1,6}(?:,\d{3})*\.\d{2}\s*$").unwrap());
static SUSPECT_SKU: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\d{5,}\b").unwrap());

fn clean_str(value: Option<&str>) -> Option<String> {
    let v = value?.trim();
    (!v.is_empty()).then(|| v.to_string())
}

/// Lenient money parsing for user or OCR supplied strings: `$1,234.56`,
/// `12,34`, `USD 7.10`
pub fn clean_money(value: &str) -> Option<f64> {
    let s: String = value
        .trim()
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-'))
        .collect();
    if s.is_empty() {
        return None;
    }

    let s = if s.contains(',') && s.contains('.') {
        s.replace(',', "")
    } else if s.matches(',').count() == 1 {
        s.replace(',', ".")
    } else {
        s
    };
    s.parse().ok()
}

/// A money value as it may appear in stored payloads or review requests
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum MoneyInput {
    Number(f64),
    Text(String),
}

/// Strict total coercion. Rejects SKU/UPC leakage (`797860`, `797.860`)
/// and anything outside `[0, 50000)`.
pub fn coerce_money(value: &MoneyInput) -> Option<f64> {
    match value {
        MoneyInput::Number(f) => {
            let f = *f;
            if !f.is_finite() || !(0.0..50_000.0).contains(&f) {
                return None;
            }
            if f >= 10_000.0 && f.fract() == 0.0 {
                return None;
            }
            Some(f)
        }
        MoneyInput::Text(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            if SUSPECT_SKU.is_match(s) && !s.contains('.') {
                return None;
            }
            if !MONEY_2DP.is_match(s) {
                return None;
            }
            s.replace(['$', ','], "").trim().parse().ok()
        }
    }
}

/// `deserialize_with` helper accepting a number, a money string or null
pub fn lenient_money<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<MoneyInput>::deserialize(deserializer)?;
    Ok(match raw {
        Some(MoneyInput::Number(n)) => Some(n),
        Some(MoneyInput::Text(s)) => clean_money(&s),
        None => None,
    })
}

pub fn normalize_receipt(parsed: &ReceiptParsed) -> ReceiptNormalized {
    let needs_review = parsed.needs_review || !parsed.flags.is_empty();
    ReceiptNormalized {
        vendor: clean_str(parsed.vendor.as_deref()),
        vendor_confidence: parsed.vendor_confidence,
        vendor_reasoning: parsed.vendor_reasoning.clone(),
        vendor_source: parsed.vendor_source.clone(),

        date: clean_str(parsed.date.as_deref()),
        date_confidence: parsed.date_confidence,
        date_reasoning: parsed.date_reasoning.clone(),

        total: parsed.total,
        total_confidence: parsed.total_confidence,
        total_reasoning: parsed.total_reasoning.clone(),

        tax: parsed.tax,

        category: clean_str(parsed.category.as_deref()),
        category_confidence: parsed.category_confidence,
        category_reasoning: parsed.category_reasoning.clone(),

        explanation: None,
        business_type: None,
        business_state: None,

        flags: parsed.flags.clone(),
        needs_review,
    }
}

/// Keep `normalized.total` aligned with a valid parsed total
pub fn reconcile_total(parsed: &ReceiptParsed, normalized: &mut ReceiptNormalized) {
    let parsed_total = parsed.total.map(MoneyInput::Number).as_ref().and_then(coerce_money);

    if normalized.total.is_none() {
        if let Some(total) = parsed_total {
            normalized.total = Some((total * 100.0).round() / 100.0);
        }
    }
    if normalized.total_confidence == 0.0 {
        normalized.total_confidence = parsed.total_confidence;
    }
    if normalized.total_reasoning.is_empty() && !parsed.total_reasoning.is_empty() {
        normalized.total_reasoning = parsed.total_reasoning.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_money_formats() {
        assert_eq!(clean_money("$1,234.56"), Some(1234.56));
        assert_eq!(clean_money("12,34"), Some(12.34));
        assert_eq!(clean_money("USD 7.10"), Some(7.1));
        assert_eq!(clean_money("n/a"), None);
    }

    #[test]
    fn test_coerce_money_rejects_skus() {
        assert_eq!(coerce_money(&MoneyInput::Number(35.62)), Some(35.62));
        assert_eq!(coerce_money(&MoneyInput::Number(797860.0)), None);
        assert_eq!(coerce_money(&MoneyInput::Number(12000.0)), None);
        assert_eq!(coerce_money(&MoneyInput::Number(12000.5)), Some(12000.5));
        assert_eq!(coerce_money(&MoneyInput::Number(-1.0)), None);
        assert_eq!(coerce_money(&MoneyInput::Text("$1,234.56".into())), Some(1234.56));
        assert_eq!(coerce_money(&MoneyInput::Text("797.860".into())), None);
        assert_eq!(coerce_money(&MoneyInput::Text("797860".into())), None);
    }

    #[test]
    fn test_normalize_trims_and_flags_review() {
        let parsed = ReceiptParsed {
            vendor: Some("  Shell  ".into()),
            date: Some("   ".into()),
            total: Some(40.0),
            flags: vec!["TOTAL_MISSING".into()],
            ..Default::default()
        };
        let normalized = normalize_receipt(&parsed);
        assert_eq!(normalized.vendor.as_deref(), Some("Shell"));
        assert!(normalized.date.is_none());
        assert!(normalized.needs_review);
    }

    #[test]
    fn test_reconcile_total_fills_missing() {
        let parsed = ReceiptParsed {
            total: Some(18.404),
            total_confidence: 93.0,
            total_reasoning: "Strong label match".into(),
            ..Default::default()
        };
        let mut normalized = ReceiptNormalized::default();
        reconcile_total(&parsed, &mut normalized);
        assert_eq!(normalized.total, Some(18.4));
        assert_eq!(normalized.total_confidence, 93.0);
        assert_eq!(normalized.total_reasoning, "Strong label match");
    }

    #[test]
    fn test_lenient_money_deserialize() {
        #[derive(Deserialize)]
        struct Patch {
            #[serde(default, deserialize_with = "lenient_money")]
            total: Option<f64>,
        }
        let p: Patch = serde_json::from_str(r#"{"total": "$12.50"}"#).unwrap();
        assert_eq!(p.total, Some(12.5));
        let p: Patch = serde_json::from_str(r#"{"total": 9}"#).unwrap();
        assert_eq!(p.total, Some(9.0));
        let p: Patch = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(p.total, None);
    }
}
