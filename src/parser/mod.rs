//! Receipt text parser
//!
//! Turns raw OCR text (possibly merged from several OCR passes) into vendor,
//! date, tax and total guesses, each with a 0-100 confidence and a human
//! readable reason.

mod date;
mod money;
mod tax;
mod text;
mod total;
mod vendor;

pub use date::{extract_date, DateGuess};
pub use money::{money_tokens, money_values, MoneyKind, MoneyToken};
pub use tax::{extract_tax, is_bad_total_context, TaxGuess};
pub use text::{normalize_text, Sections};
pub use total::{extract_total, TotalGuess};
pub use vendor::{extract_vendor, VendorGuess, VENDOR_ALIASES};

use chrono::{NaiveDate, Utc};

use crate::receipt::ReceiptParsed;

pub const TOTAL_MISSING: &str = "TOTAL_MISSING";

/// Parse OCR text relative to today's date
pub fn parse_receipt(ocr_text: &str) -> ReceiptParsed {
    parse_receipt_at(ocr_text, Utc::now().date_naive())
}

/// Parse OCR text; `today` anchors date plausibility
pub fn parse_receipt_at(ocr_text: &str, today: NaiveDate) -> ReceiptParsed {
    let text = normalize_text(ocr_text);
    let lines: Vec<String> = text.lines().map(str::to_string).collect();
    let sections = Sections::split(&lines);

    let vendor = extract_vendor(&lines, &sections);
    let date = extract_date(&lines, &sections, today);
    let tax = extract_tax(&lines, &sections);
    let total = extract_total(&lines, &sections, tax.value);

    let mut parsed = ReceiptParsed {
        vendor: vendor.name,
        vendor_confidence: vendor.confidence,
        vendor_reasoning: vendor.reasoning,
        vendor_source: vendor.source,
        date: date.iso,
        date_confidence: date.confidence,
        date_reasoning: date.reasoning,
        tax: tax.value,
        total: total.value,
        total_confidence: total.confidence,
        total_reasoning: total.reasoning,
        ..Default::default()
    };

    if tax.confidence > 0.0 {
        parsed.tax_confidence = Some(tax.confidence);
        parsed.tax_reasoning = Some(tax.reasoning);
    }

    if parsed.total.map_or(true, |t| t == 0.0) {
        parsed.flags.push(TOTAL_MISSING.to_string());
        parsed.needs_review = true;
    }

    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 1).unwrap()
    }

    #[test]
    fn test_parse_full_receipt() {
        let ocr = "AUTOZONE #4821\n123 Main Street\nDate: 01/27/2026\n\
                   Wiper Blades 2 @ 12.99\nSubtotal 25.98\nSales Tax 1.56\nTotal 27.54\n\
                   VISA 27.54";
        let parsed = parse_receipt_at(ocr, today());

        assert_eq!(parsed.vendor.as_deref(), Some("AutoZone"));
        assert_eq!(parsed.date.as_deref(), Some("2026-01-27"));
        assert_eq!(parsed.tax, Some(1.56));
        assert!(parsed.tax_confidence.is_some());
        assert_eq!(parsed.total, Some(27.54));
        assert!(parsed.flags.is_empty());
        assert!(!parsed.needs_review);
    }

    #[test]
    fn test_missing_total_is_flagged() {
        let parsed = parse_receipt_at("THANK YOU\nCOME AGAIN", today());
        assert!(parsed.total.is_none());
        assert_eq!(parsed.flags, vec![TOTAL_MISSING.to_string()]);
        assert!(parsed.needs_review);
        assert!(parsed.tax_confidence.is_none());
    }

    #[test]
    fn test_empty_text_never_panics() {
        let parsed = parse_receipt_at("", today());
        assert!(parsed.vendor.is_none());
        assert_eq!(parsed.vendor_reasoning, "No OCR lines.");
        assert!(parsed.needs_review);
    }
}
