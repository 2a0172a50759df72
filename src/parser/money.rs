//! Money candidates from noisy OCR text
//!
//! Handles `$12.34`, `1,234.56`, comma decimals (`12,34`), truncated decimals
//! (`47.4`) and, when the surrounding text is clearly about totals, implied
//! cents integers (`4749` -> 47.49).

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::text::neighborhood;

const MAX_AMOUNT: f64 = 50_000.0;

static DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$?\s*((?:\d{1,3}(?:,\d{3})+|\d+)\.\d{2})").unwrap());
static COMMA_DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$?\s*(\d{1,6},\d{2})\b").unwrap());
static TRUNCATED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$?\s*(\d{1,6}\.\d)\b").unwrap());
static BARE_INT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(\d{3,6})\b").unwrap());
static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(\d{3}\)|\d{3}[-\s]\d{3}[-\s]\d{4}").unwrap());
static DIGIT_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());

const TOTALS_CONTEXT: &[&str] = &[
    "total", "sale total", "grand total", "amount due", "balance due", "subtotal", "tax", "vat",
    "gst", "hst", "order total",
];

const ID_CONTEXT: &[&str] = &[
    "aid", "auth", "approval", "ref", "reference", "tran", "trans", "invoice #", "inv#", "order",
    "acct", "account", "card", "mastercard", "visa", "amex",
];

const ID_MARKERS: &[&str] = &[
    "id", "aid", "ref", "auth", "approval", "appr", "tran", "txn", "inv", "invoice", "order",
    "store", "register", "terminal", "cashier", "mastercard", "visa", "amex", "acct", "account",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoneyKind {
    Decimal,
    ImpliedCents,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MoneyToken {
    pub value: f64,
    pub raw: String,
    pub pos: usize,
    pub kind: MoneyKind,
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn in_range(v: f64) -> bool {
    v > 0.0 && v <= MAX_AMOUNT
}

/// Explicit amounts plus guarded implied cents, with duplicates at the same
/// position removed
fn decimal_candidates(text: &str) -> Vec<(f64, String, usize)> {
    let mut out = Vec::new();
    let mut push = |value: f64, raw: &str, pos: usize| {
        if in_range(value) {
            out.push((round2(value), raw.trim().to_string(), pos));
        }
    };

    for caps in DECIMAL.captures_iter(text) {
        let Some(m) = caps.get(0) else { continue };
        if let Ok(v) = caps[1].replace(',', "").parse::<f64>() {
            push(v, m.as_str(), m.start());
        }
    }

    for caps in COMMA_DECIMAL.captures_iter(text) {
        let Some(m) = caps.get(0) else { continue };
        if let Ok(v) = caps[1].replace(',', ".").parse::<f64>() {
            push(v, m.as_str(), m.start());
        }
    }

    for caps in TRUNCATED.captures_iter(text) {
        let Some(m) = caps.get(0) else { continue };
        if let Ok(v) = caps[1].parse::<f64>() {
            push(v, m.as_str(), m.start());
        }
    }

    let lower = text.to_lowercase();
    let totals_context = TOTALS_CONTEXT.iter().any(|k| lower.contains(k));
    let id_context = ID_CONTEXT.iter().any(|k| lower.contains(k));

    if totals_context && !id_context {
        for caps in BARE_INT.captures_iter(text) {
            let Some(m) = caps.get(1) else { continue };
            let digits = m.as_str();
            if digits.len() == 4 && (digits.starts_with("19") || digits.starts_with("20")) {
                continue;
            }
            if PHONE.is_match(neighborhood(text, m.start(), m.end(), 8)) {
                continue;
            }
            if let Ok(iv) = digits.parse::<u32>() {
                push(iv as f64 / 100.0, digits, m.start());
            }
        }
    }

    let mut seen = HashSet::new();
    out.retain(|(value, _, pos)| seen.insert(((value * 100.0).round() as i64, *pos)));
    out
}

/// Strict implied-cents reading of bare 3-7 digit runs. Receipts are full of
/// store, terminal and approval numbers, so anything near an id marker is
/// dropped and 5-digit runs need a `$` nearby.
fn implied_cents_candidates(text: &str) -> Vec<(f64, String, usize)> {
    let mut out = Vec::new();

    for m in DIGIT_RUN.find_iter(text) {
        let digits = m.as_str();
        if !(3..=7).contains(&digits.len()) {
            continue;
        }

        let ctx = neighborhood(text, m.start(), m.end(), 18).to_lowercase();
        if ID_MARKERS.iter().any(|k| ctx.contains(k)) {
            continue;
        }
        if digits.len() == 5 && !ctx.contains('$') {
            continue;
        }

        let Ok(iv) = digits.parse::<u32>() else {
            continue;
        };
        let value = round2(iv as f64 / 100.0);
        if in_range(value) {
            out.push((value, digits.to_string(), m.start()));
        }
    }

    out
}

/// All money tokens: explicit decimals first, then implied cents
pub fn money_tokens(text: &str) -> Vec<MoneyToken> {
    let decimals = decimal_candidates(text)
        .into_iter()
        .map(|(value, raw, pos)| MoneyToken { value, raw, pos, kind: MoneyKind::Decimal });
    let implied = implied_cents_candidates(text)
        .into_iter()
        .map(|(value, raw, pos)| MoneyToken { value, raw, pos, kind: MoneyKind::ImpliedCents });
    decimals.chain(implied).collect()
}

/// Money values in `text`. Implied cents are only trusted next to a label.
pub fn money_values(text: &str, labeled_window: bool) -> Vec<f64> {
    money_tokens(text)
        .into_iter()
        .filter(|t| labeled_window || t.kind != MoneyKind::ImpliedCents)
        .map(|t| t.value)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_amounts() {
        let values = money_values("Coffee $4.50\nMuffin 1,234.56", false);
        assert!(values.contains(&4.5));
        assert!(values.contains(&1234.56));
    }

    #[test]
    fn test_comma_decimal_and_truncated() {
        assert!(money_values("SUMME 12,34", false).contains(&12.34));
        assert!(money_values("TOTAL 47.4 ", false).contains(&47.4));
    }

    #[test]
    fn test_implied_cents_only_when_labeled() {
        let text = "Amount 4749";
        assert!(!money_values(text, false).contains(&47.49));
        assert!(money_values(text, true).contains(&47.49));
    }

    #[test]
    fn test_implied_cents_skip_id_context() {
        let tokens = implied_cents_candidates("Store 4821 Register 3");
        assert!(tokens.is_empty());
    }

    #[test]
    fn test_five_digit_runs_need_dollar_sign() {
        assert!(implied_cents_candidates("amount 34689").is_empty());
        assert_eq!(implied_cents_candidates("amount $ 34689")[0].0, 346.89);
    }

    #[test]
    fn test_years_and_phones_are_not_money() {
        let tokens = decimal_candidates("Total due 2024 call (302) 555-1234");
        assert!(tokens.iter().all(|(v, _, _)| *v != 20.24));
        assert!(tokens.iter().all(|(v, _, _)| *v != 3.02));
    }

    #[test]
    fn test_out_of_range_dropped() {
        assert!(money_values("0.00", false).is_empty());
        assert!(money_values("75000.00", false).is_empty());
    }
}
