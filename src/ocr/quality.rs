//! Cheap text-quality heuristics used to pick between OCR attempts
//! and to decide which conditional passes are worth running.

use std::sync::LazyLock;

use regex::Regex;

pub const TOTALISH: &[&str] = &[
    "sale total",
    "grand total",
    "total",
    "amount due",
    "balance due",
    "invoice total",
    "subtotal",
];

pub const TAXISH: &[&str] = &["sales tax", "tax", "vat", "gst", "hst"];

static MONEY_DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d+\.\d{2}\b").expect("valid regex"));
static MONEY_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{3,6}\b").expect("valid regex"));

pub fn has_totalish_keywords(text: &str) -> bool {
    let lo = text.to_lowercase();
    TOTALISH.iter().chain(TAXISH).any(|k| lo.contains(k))
}

pub fn has_money_tokens(text: &str) -> bool {
    MONEY_DECIMAL.is_match(text) || MONEY_DIGITS.is_match(text)
}

/// Score in 0..1 from length, alphanumeric density, token count,
/// totals keywords and money tokens
pub fn text_quality_score(text: &str) -> f64 {
    let t = text.trim();
    if t.is_empty() {
        return 0.0;
    }

    let length = t.chars().count() as f64;
    let alnum = t.chars().filter(|c| c.is_alphanumeric()).count() as f64;
    let density = alnum / length.max(1.0);
    let tokens = t.split_whitespace().count() as f64;

    let mut score = 0.0;
    score += (length / 600.0 * 0.45).min(0.45);
    score += (density * 0.20).min(0.20);
    score += (tokens / 80.0 * 0.10).min(0.10);
    if has_totalish_keywords(t) {
        score += 0.15;
    }
    if has_money_tokens(t) {
        score += 0.10;
    }
    score.clamp(0.0, 1.0)
}

/// Map a 0..1 score onto the 0..100 confidence scale
pub fn score_to_conf(score: f64, bump: f64, cap: f64) -> f64 {
    (score * 100.0 + bump).clamp(0.0, cap)
}

/// Text names totals or tax but no amount came through
pub fn looks_like_totals_missing(text: &str) -> bool {
    if text.is_empty() {
        return true;
    }
    has_totalish_keywords(text) && !has_money_tokens(text)
}

/// Top of the receipt is too short or too numeric to hold a merchant name
pub fn looks_like_vendor_letters_missing(text: &str) -> bool {
    if text.is_empty() {
        return true;
    }
    let top = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .take(6)
        .collect::<Vec<_>>()
        .join(" ");
    if top.chars().count() < 10 {
        return true;
    }
    let alpha = top.chars().filter(|c| c.is_alphabetic()).count();
    let digit = top.chars().filter(|c| c.is_ascii_digit()).count();
    alpha < 6 || (digit > alpha * 2 && digit > 8)
}

/// Normalize newlines, keep printable ASCII, collapse runs of whitespace
/// and drop blank lines
pub fn cleanup_text(text: &str) -> String {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    text.split('\n')
        .map(|line| {
            line.chars()
                .filter(|c| matches!(c, '\t' | ' '..='~'))
                .collect::<String>()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_prefers_receipt_like_text() {
        let noise = text_quality_score("~~ ;; ..");
        let receipt = text_quality_score("SHELL OIL\n123 MAIN ST\nTOTAL 40.00\nTAX 2.40");
        assert!(receipt > noise);
        assert_eq!(text_quality_score("   "), 0.0);
        assert!(text_quality_score(&"TOTAL 12.34 ".repeat(200)) <= 1.0);
    }

    #[test]
    fn test_score_to_conf_caps() {
        assert_eq!(score_to_conf(0.5, 0.0, 100.0), 50.0);
        assert_eq!(score_to_conf(0.95, 4.0, 94.0), 94.0);
        assert_eq!(score_to_conf(0.0, 0.0, 90.0), 0.0);
    }

    #[test]
    fn test_totals_missing() {
        assert!(looks_like_totals_missing(""));
        assert!(looks_like_totals_missing("TOTAL\nTHANK YOU"));
        assert!(!looks_like_totals_missing("TOTAL 12.50"));
        assert!(!looks_like_totals_missing("HELLO WORLD"));
    }

    #[test]
    fn test_vendor_letters_missing() {
        assert!(looks_like_vendor_letters_missing(""));
        assert!(looks_like_vendor_letters_missing("12\n34"));
        assert!(looks_like_vendor_letters_missing("AB 1234567890 99887766"));
        assert!(!looks_like_vendor_letters_missing("HOME DEPOT\n2455 PACES FERRY RD"));
    }

    #[test]
    fn test_cleanup_text() {
        let raw = "  SHELL\u{2122}   OIL \r\n\r\n TOTAL\t 40.00 \r";
        assert_eq!(cleanup_text(raw), "SHELL OIL\nTOTAL 40.00");
        assert_eq!(cleanup_text(""), "");
    }
}
