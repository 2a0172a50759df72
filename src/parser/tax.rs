//! Sales tax extraction
//!
//! Explicit tax lines win; otherwise tax is inferred as `total - subtotal`
//! when both are visible and the difference is a plausible rate.

use super::money::money_values;
use super::text::{clamp01, to_conf_100, Sections};

const TAX_STRONG: &[&str] = &[
    "sales tax",
    "estimated tax",
    "tax to be collected",
    "tax collected",
    "tax amount",
    "vat",
    "gst",
    "pst",
    "hst",
    "qst",
    "iva",
    "mwst",
    "tva",
];

const TAX_MEDIUM: &[&str] = &["tax:", " tax ", "tax "];

/// Phrases containing "tax" that never carry the tax amount
const TAX_TRAPS: &[&str] = &[
    "before tax",
    "total before tax",
    "pre-tax",
    "pretax",
    "taxable",
    "tax rate",
    "tax %",
    "tax percent",
    "% tax",
    "tax id",
    "tax no",
    "tax number",
    "tax invoice",
];

const SUBTOTAL_LABELS: &[&str] = &[
    "subtotal",
    "sub total",
    "total before tax",
    "before tax total",
    "pre-tax total",
    "pretax total",
    "merchandise",
    "items subtotal",
];

const TOTAL_LABELS: &[&str] = &[
    "grand total",
    "order total",
    "amount due",
    "balance due",
    "total:",
    "total $",
    "total ",
];

const BAD_TOTAL_HINTS: &[&str] = &[
    "item total",
    "items total",
    "item(s) total",
    "subtotal",
    "sub total",
    "total before tax",
    "pretax",
    "pre tax",
    "before tax",
    "tax",
    "sales tax",
    "vat",
    "gst",
    "hst",
    "discount",
    "coupon",
    "savings",
    "change",
    "cash",
    "tender",
    "payment",
    "paid",
    "balance",
    "amount due",
    "tip",
    "gratuity",
    "shipping",
    "handling",
    "deposit",
    "auth",
    "authorization",
];

const GOOD_TOTAL_HINTS: &[&str] = &[
    "grand total",
    "order total",
    "total due",
    "amount due",
    "balance due",
    "total:",
];

/// True when a line is unlikely to hold the grand total (item totals,
/// subtotals, tax, tender). A final-total label overrides.
pub fn is_bad_total_context(text: &str) -> bool {
    let t = text.to_lowercase();
    if t.is_empty() || GOOD_TOTAL_HINTS.iter().any(|g| t.contains(g)) {
        return false;
    }
    BAD_TOTAL_HINTS.iter().any(|b| t.contains(b))
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaxGuess {
    pub value: Option<f64>,
    pub confidence: f64,
    pub reasoning: String,
}

fn last_money(line: &str) -> Option<f64> {
    money_values(line, true).last().copied()
}

fn has_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

struct Seen {
    value: f64,
    source: String,
}

pub fn extract_tax(lines: &[String], sections: &Sections) -> TaxGuess {
    if lines.is_empty() {
        return TaxGuess {
            value: None,
            confidence: 0.0,
            reasoning: "No OCR text.".to_string(),
        };
    }

    let scan = sections
        .totals_pass
        .iter()
        .map(|l| ("totals_pass", l))
        .chain(lines.iter().map(|l| ("full", l)));

    let mut best: Option<(f64, f64, String)> = None;
    let mut subtotal: Option<Seen> = None;
    let mut total: Option<Seen> = None;

    for (src, line) in scan {
        let t = line.trim().to_lowercase();
        if t.is_empty() {
            continue;
        }

        if subtotal.is_none() && has_any(&t, SUBTOTAL_LABELS) {
            if let Some(value) = last_money(line) {
                subtotal = Some(Seen {
                    value,
                    source: format!("{}: '{}'", src, line),
                });
            }
        }

        if total.is_none() && has_any(&t, TOTAL_LABELS) && !is_bad_total_context(&t) {
            if let Some(value) = last_money(line) {
                total = Some(Seen {
                    value,
                    source: format!("{}: '{}'", src, line),
                });
            }
        }

        if has_any(&t, TAX_TRAPS) {
            continue;
        }

        let strong = has_any(&t, TAX_STRONG);
        let medium = !strong && has_any(&t, TAX_MEDIUM);
        if !strong && !medium {
            continue;
        }

        let Some(value) = last_money(line) else {
            continue;
        };

        let mut score = if strong { 0.85 } else { 0.70 };
        if src == "totals_pass" {
            score += 0.08;
        }
        if line.contains('$') {
            score += 0.03;
        }
        if value < 0.01 {
            score -= 0.50;
        }
        if value > 500.0 {
            score -= 0.25;
        }
        if total.as_ref().is_some_and(|t| value > t.value) {
            score -= 0.60;
        }

        let score = clamp01(score);
        if best.as_ref().map_or(score > 0.0, |(_, s, _)| score > *s) {
            let strength = if strong { "strong" } else { "medium" };
            best = Some((
                value,
                score,
                format!("Matched {} tax label; Source: ({}) '{}'", strength, src, line),
            ));
        }
    }

    if let Some((value, score, reasoning)) = best {
        return TaxGuess {
            value: Some(round2(value)),
            confidence: to_conf_100(score),
            reasoning,
        };
    }

    if let (Some(total), Some(subtotal)) = (&total, &subtotal) {
        let inferred = round2(total.value - subtotal.value);
        if inferred >= 0.0 && total.value > 0.0 && inferred / total.value <= 0.25 {
            let mut conf = 0.70;
            if total.source.contains("totals_pass") && subtotal.source.contains("totals_pass") {
                conf += 0.05;
            }
            return TaxGuess {
                value: Some(inferred),
                confidence: to_conf_100(conf),
                reasoning: format!(
                    "Inferred tax = total - subtotal ({:.2} - {:.2}). Total from {}; subtotal from {}",
                    total.value, subtotal.value, total.source, subtotal.source
                ),
            };
        }
    }

    TaxGuess {
        value: None,
        confidence: 0.0,
        reasoning: "No tax line detected.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(str::to_string).collect()
    }

    #[test]
    fn test_strong_tax_label() {
        let l = lines("SUBTOTAL 20.00\nSALES TAX $1.20\nTOTAL 21.20");
        let guess = extract_tax(&l, &Sections::split(&l));
        assert_eq!(guess.value, Some(1.2));
        assert_eq!(guess.confidence, 88.0);
        assert!(guess.reasoning.starts_with("Matched strong tax label"));
    }

    #[test]
    fn test_trap_lines_are_ignored() {
        let l = lines("Total before tax 20.00\nTax rate 6.00\nTotal: 21.20");
        let guess = extract_tax(&l, &Sections::split(&l));
        assert_eq!(guess.value, Some(1.2));
        assert!(guess.reasoning.starts_with("Inferred tax = total - subtotal (21.20 - 20.00)"));
        assert_eq!(guess.confidence, 70.0);
    }

    #[test]
    fn test_implausible_inference_refused() {
        let l = lines("Subtotal 5.00\nTotal: 21.20");
        let guess = extract_tax(&l, &Sections::split(&l));
        assert!(guess.value.is_none());
        assert_eq!(guess.reasoning, "No tax line detected.");
    }

    #[test]
    fn test_bad_total_context() {
        assert!(is_bad_total_context("item total 4.00"));
        assert!(is_bad_total_context("cash 50.00"));
        assert!(!is_bad_total_context("grand total 21.20"));
        assert!(!is_bad_total_context("amount due 9.99"));
    }
}
