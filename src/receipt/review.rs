//! Review flags, state sales-tax rules and accountant corrections

use std::collections::HashSet;

use crate::ocr::OcrStatus;
use crate::parser::TOTAL_MISSING;

use super::types::{ReceiptNormalized, ReceiptParsed, ReceiptPayload, ReceiptReviewPatch};

/// States without a general sales tax
pub const NO_SALES_TAX_STATES: &[&str] = &["DE", "NH", "MT", "OR", "AK"];

pub const NO_SALES_TAX_STATE: &str = "NO_SALES_TAX_STATE";
pub const MISSING_CATEGORY: &str = "MISSING_CATEGORY";

const REVIEWER_REASONING: &str = "Set by reviewer";

/// Drop any parsed tax for receipts from a no-sales-tax state
pub fn apply_sales_tax_rules(parsed: &mut ReceiptParsed, business_state: &str) {
    let state = business_state.trim().to_uppercase();
    if !NO_SALES_TAX_STATES.contains(&state.as_str()) {
        return;
    }

    parsed.tax = None;
    if !parsed.flags.iter().any(|f| f == NO_SALES_TAX_STATE) {
        parsed.flags.push(NO_SALES_TAX_STATE.to_string());
    }
}

/// Review flags for a receipt, in a stable order, plus whether it needs review
pub fn compute_flags(
    ocr_status: OcrStatus,
    normalized: &ReceiptNormalized,
    parser_flags: &[String],
) -> (Vec<String>, bool) {
    let mut flags: Vec<String> = Vec::new();

    if let (Some(total), Some(tax)) = (normalized.total, normalized.tax) {
        if tax < 0.0 {
            flags.push("TAX_NEGATIVE".into());
        }
        if tax > total {
            flags.push("TAX_GT_TOTAL".into());
        }
        if total > 0.0 && tax / total > 0.25 {
            flags.push("TAX_IMPLAUSIBLE_RATE".into());
        }
    }

    if !matches!(ocr_status, OcrStatus::Success | OcrStatus::LowConfidence) {
        flags.push(format!("OCR_{}", ocr_status.as_str().to_uppercase()));
    }

    let weak_total_reason = {
        let reason = normalized.total_reasoning.to_lowercase();
        ["unlabeled", "bad context", "weak label match"]
            .iter()
            .any(|k| reason.contains(k))
    };

    if normalized.total_confidence < 80.0 {
        flags.push("LOW_TOTAL_CONFIDENCE".into());
    }
    if weak_total_reason {
        flags.push("TOTAL_CONTEXT_WEAK".into());
    }
    if normalized.date_confidence < 70.0 {
        flags.push("LOW_DATE_CONFIDENCE".into());
    }
    if normalized.vendor_confidence < 70.0 {
        flags.push("LOW_VENDOR_CONFIDENCE".into());
    }
    if normalized.tax.is_none() && (normalized.total_confidence < 80.0 || weak_total_reason) {
        flags.push("TAX_MISSING_REVIEW".into());
    }

    if normalized.vendor.as_deref().map_or(true, str::is_empty) {
        flags.push("MISSING_VENDOR".into());
    }
    if normalized.date.as_deref().map_or(true, str::is_empty) {
        flags.push("MISSING_DATE".into());
    }
    if normalized.total.is_none() {
        flags.push("MISSING_TOTAL".into());
    }
    if normalized.category.as_deref().map_or(true, str::is_empty) {
        flags.push(MISSING_CATEGORY.into());
    }

    flags.extend(
        parser_flags
            .iter()
            .map(|f| f.trim())
            .filter(|f| !f.is_empty())
            .map(str::to_uppercase),
    );

    let mut seen = HashSet::new();
    flags.retain(|f| seen.insert(f.clone()));

    let needs_review = !flags.is_empty();
    (flags, needs_review)
}

/// Apply an accountant's corrections and recompute the review state.
/// Patched fields are marked reviewed; parser flags they resolve are dropped.
pub fn apply_review_patch(payload: &mut ReceiptPayload, patch: &ReceiptReviewPatch) {
    let parsed = &mut payload.parsed;
    let normalized = &mut payload.normalized;

    if let Some(vendor) = patch.vendor.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        parsed.vendor = Some(vendor.to_string());
        parsed.vendor_confidence = 100.0;
        parsed.vendor_reasoning = REVIEWER_REASONING.to_string();
        normalized.vendor = Some(vendor.to_string());
        normalized.vendor_confidence = 100.0;
        normalized.vendor_reasoning = REVIEWER_REASONING.to_string();
    }

    if let Some(date) = patch.date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
        parsed.date = Some(date.to_string());
        parsed.date_confidence = 100.0;
        parsed.date_reasoning = REVIEWER_REASONING.to_string();
        normalized.date = Some(date.to_string());
        normalized.date_confidence = 100.0;
        normalized.date_reasoning = REVIEWER_REASONING.to_string();
    }

    if let Some(total) = patch.total {
        parsed.total = Some(total);
        parsed.total_confidence = 100.0;
        parsed.total_reasoning = REVIEWER_REASONING.to_string();
        normalized.total = Some(total);
        normalized.total_confidence = 100.0;
        normalized.total_reasoning = REVIEWER_REASONING.to_string();
        parsed.flags.retain(|f| f != TOTAL_MISSING);
    }

    if let Some(tax) = patch.tax {
        parsed.tax = Some(tax);
        parsed.tax_confidence = Some(100.0);
        parsed.tax_reasoning = Some(REVIEWER_REASONING.to_string());
        normalized.tax = Some(tax);
    }

    if let Some(category) = patch.category.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        parsed.category = Some(category.to_string());
        parsed.category_confidence = 1.0;
        parsed.category_reasoning = REVIEWER_REASONING.to_string();
        normalized.category = Some(category.to_string());
        normalized.category_confidence = 1.0;
        normalized.category_reasoning = REVIEWER_REASONING.to_string();
        parsed.flags.retain(|f| f != MISSING_CATEGORY);
    }

    if let Some(explanation) = patch.explanation.as_deref() {
        parsed.explanation = Some(explanation.to_string());
        normalized.explanation = Some(explanation.to_string());
        payload.explanation = Some(explanation.to_string());
    }

    let (flags, needs_review) = compute_flags(
        payload.ocr.ocr_status,
        &payload.normalized,
        &payload.parsed.flags,
    );
    payload.parsed.needs_review = needs_review;
    payload.normalized.flags = flags.clone();
    payload.normalized.needs_review = needs_review;
    payload.flags = flags;
    payload.needs_review = needs_review;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn confident() -> ReceiptNormalized {
        ReceiptNormalized {
            vendor: Some("Shell".into()),
            vendor_confidence: 97.0,
            date: Some("2026-01-27".into()),
            date_confidence: 90.0,
            total: Some(40.0),
            total_confidence: 95.0,
            total_reasoning: "Labeled total window".into(),
            tax: Some(2.4),
            category: Some("Fuel".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_clean_receipt_has_no_flags() {
        let (flags, needs_review) = compute_flags(OcrStatus::Success, &confident(), &[]);
        assert!(flags.is_empty());
        assert!(!needs_review);
    }

    #[test]
    fn test_flag_order_and_dedupe() {
        let mut n = confident();
        n.tax = Some(50.0);
        n.category = None;
        let parser_flags = vec![" missing_category ".to_string(), "TOTAL_MISSING".to_string()];
        let (flags, needs_review) = compute_flags(OcrStatus::Failed, &n, &parser_flags);
        assert_eq!(
            flags,
            vec![
                "TAX_GT_TOTAL",
                "TAX_IMPLAUSIBLE_RATE",
                "OCR_FAILED",
                "MISSING_CATEGORY",
                "TOTAL_MISSING",
            ]
        );
        assert!(needs_review);
    }

    #[test]
    fn test_weak_total_requires_tax_review() {
        let mut n = confident();
        n.tax = None;
        n.total_reasoning = "Unlabeled candidate. Source: '40.00'".into();
        let (flags, _) = compute_flags(OcrStatus::LowConfidence, &n, &[]);
        assert_eq!(flags, vec!["TOTAL_CONTEXT_WEAK", "TAX_MISSING_REVIEW"]);
    }

    #[test]
    fn test_no_sales_tax_state() {
        let mut parsed = ReceiptParsed {
            tax: Some(1.2),
            ..Default::default()
        };
        apply_sales_tax_rules(&mut parsed, " de ");
        apply_sales_tax_rules(&mut parsed, "DE");
        assert!(parsed.tax.is_none());
        assert_eq!(parsed.flags, vec![NO_SALES_TAX_STATE]);

        let mut parsed = ReceiptParsed {
            tax: Some(1.2),
            ..Default::default()
        };
        apply_sales_tax_rules(&mut parsed, "PA");
        assert_eq!(parsed.tax, Some(1.2));
    }

    #[test]
    fn test_review_patch_resolves_flags() {
        let mut payload = ReceiptPayload {
            normalized: ReceiptNormalized {
                total: None,
                category: None,
                ..confident()
            },
            parsed: ReceiptParsed {
                flags: vec![TOTAL_MISSING.into(), MISSING_CATEGORY.into()],
                ..Default::default()
            },
            ..Default::default()
        };
        payload.ocr.ocr_status = OcrStatus::Success;

        let patch = ReceiptReviewPatch {
            total: Some(40.0),
            category: Some("Fuel".into()),
            ..Default::default()
        };
        apply_review_patch(&mut payload, &patch);

        assert_eq!(payload.normalized.total, Some(40.0));
        assert_eq!(payload.normalized.total_confidence, 100.0);
        assert_eq!(payload.parsed.category_reasoning, "Set by reviewer");
        assert!(payload.flags.is_empty());
        assert!(!payload.needs_review);
        assert!(!payload.normalized.needs_review);
    }
}
