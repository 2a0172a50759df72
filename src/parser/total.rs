//! Grand total extraction
//!
//! Three passes over the de-duplicated lines: strong labels ("Grand Total",
//! "Amount Due"), weak `total` labels outside bad contexts, then every money
//! value on the receipt scored by plausibility.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::text::{collapse_spaces, is_word_char, Sections};

static STRONG_LABELS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)grand\s*total|total\s+due|amount\s+due|balance\s+due|amount\s+payable|pay\s+this\s+amount|order\s*total",
    )
    .unwrap()
});
static WEAK_LABEL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\btotal\b").unwrap());
static ITEM_MATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b\d+\s*(?:x|@)\s*\$?\s*\d+(\.\d{1,2})?\b").unwrap());
static PLAIN_AMOUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(\.\d{1,2})?$").unwrap());

const BAD_CONTEXT: &[&str] = &[
    "subtotal",
    "sub total",
    "item total",
    "items total",
    "line total",
    "extended",
    "ext price",
    "extension",
    "merchandise",
    "merch total",
    "taxable",
    "vat",
    "tip",
    "gratuity",
    "tender",
    "cash",
    "change",
    "amount tendered",
    "payment",
    "debit",
    "credit",
    "card",
    "visa",
    "mastercard",
    "auth",
    "approval",
    "discount",
    "savings",
    "refund",
];

#[derive(Debug, Clone, PartialEq)]
pub struct TotalGuess {
    pub value: Option<f64>,
    pub confidence: f64,
    pub reasoning: String,
}

fn is_bad_context(s: &str) -> bool {
    if STRONG_LABELS.is_match(s) {
        return false;
    }
    let lower = s.to_lowercase();
    BAD_CONTEXT.iter().any(|k| lower.contains(k)) || ITEM_MATH.is_match(&lower)
}

/// End of the longest amount continuing the digit run that ends at
/// `digits_end` and is not followed by a word character: optional
/// `,`/whitespace thousands groups, then an optional one or two digit
/// decimal part
fn amount_end(chars: &[char], digits_end: usize) -> Option<usize> {
    let is_digit = |i: usize| chars.get(i).is_some_and(|c| c.is_ascii_digit());
    let boundary_ok = |i: usize| chars.get(i).map_or(true, |c| !is_word_char(*c));

    let mut group_ends = vec![digits_end];
    let mut pos = digits_end;
    while chars.get(pos).is_some_and(|c| *c == ',' || c.is_whitespace())
        && (1..=3).all(|k| is_digit(pos + k))
    {
        pos += 4;
        group_ends.push(pos);
    }

    for &end in group_ends.iter().rev() {
        if chars.get(end) == Some(&'.') {
            for decimals in [2, 1] {
                if (1..=decimals).all(|k| is_digit(end + k)) && boundary_ok(end + decimals + 1) {
                    return Some(end + decimals + 1);
                }
            }
        }
        if boundary_ok(end) {
            return Some(end);
        }
    }
    None
}

/// Amount tokens in reading order, dollar signs stripped
fn amount_tokens(s: &str) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    let mut out = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        if !chars[i].is_ascii_digit() {
            i += 1;
            continue;
        }

        let start = i;
        let mut digits_end = i;
        while digits_end < chars.len() && chars[digits_end].is_ascii_digit() {
            digits_end += 1;
        }

        let preceded_by_word = start > 0 && is_word_char(chars[start - 1]);
        if preceded_by_word || digits_end - start > 6 {
            i = digits_end;
            continue;
        }

        match amount_end(&chars, digits_end) {
            Some(end) => {
                out.push(chars[start..end].iter().collect());
                i = end;
            }
            None => i = digits_end,
        }
    }

    out
}

/// `20.09`, `1,234.56`, `47.4`; bare `4749` reads as 47.49 only inside a
/// labeled window
fn parse_amount(token: &str, labeled_window: bool) -> Option<f64> {
    let t: String = token.trim().chars().filter(|c| *c != ',' && *c != ' ').collect();
    let t = t.strip_prefix('$').unwrap_or(&t);
    if !PLAIN_AMOUNT.is_match(t) {
        return None;
    }

    if labeled_window && !t.contains('.') && (3..=6).contains(&t.len()) {
        let (dollars, cents) = t.split_at(t.len() - 2);
        let dollars: u64 = dollars.parse().ok()?;
        let cents: u64 = cents.parse().ok()?;
        return Some(dollars as f64 + cents as f64 / 100.0);
    }

    t.parse().ok()
}

fn amounts(s: &str, labeled_window: bool) -> Vec<f64> {
    amount_tokens(s)
        .iter()
        .filter_map(|tok| parse_amount(tok, labeled_window))
        .collect()
}

struct Candidate {
    score: f64,
    value: f64,
    reason: String,
}

fn score_candidate(value: f64, ctx: &str, has_label: bool, tax: Option<f64>) -> (f64, Vec<&'static str>) {
    let mut why = Vec::new();
    let mut score: f64 = if has_label {
        why.push("Labeled total window");
        0.90
    } else {
        why.push("Unlabeled candidate");
        0.55
    };

    let lower = ctx.to_lowercase();
    if is_bad_context(ctx) {
        score -= 0.35;
        why.push("Penalized: bad context");
    }
    if lower.contains("tax") || lower.contains("vat") {
        score -= 0.30;
        why.push("Penalized: tax context");
    }
    if value < 1.0 {
        score -= 0.25;
        why.push("Penalized: too small");
    } else if value > 20_000.0 {
        score -= 0.20;
        why.push("Penalized: unusually large");
    }
    if tax.is_some_and(|t| (value - t).abs() <= 0.02) {
        score -= 0.35;
        why.push("Penalized: matches tax value");
    }
    if (value * 100.0 - (value * 100.0).round()).abs() < 1e-6 {
        score += 0.03;
        why.push("Bump: currency-like precision");
    }

    (score.clamp(0.0, 1.0), why)
}

fn candidate(score: f64, value: f64, why: &[&str], source: &str) -> Candidate {
    Candidate {
        score,
        value,
        reason: format!("{}. Source: '{}'", why.join(" ; "), source),
    }
}

/// Highest score, earliest candidate on ties
fn pick(candidates: Vec<Candidate>) -> Option<TotalGuess> {
    let mut best: Option<Candidate> = None;
    for c in candidates {
        if best.as_ref().map_or(true, |b| c.score > b.score) {
            best = Some(c);
        }
    }
    best.map(|c| TotalGuess {
        value: Some(c.value),
        confidence: (c.score * 100.0 * 100.0).round() / 100.0,
        reasoning: c.reason,
    })
}

pub fn extract_total(lines: &[String], sections: &Sections, tax: Option<f64>) -> TotalGuess {
    if lines.is_empty() {
        return TotalGuess {
            value: None,
            confidence: 0.0,
            reasoning: "No OCR text.".to_string(),
        };
    }

    let mut seen = HashSet::new();
    let all_lines: Vec<String> = lines
        .iter()
        .chain(sections.vendor_pass.iter())
        .chain(sections.totals_pass.iter())
        .chain(sections.numeric_pass.iter())
        .chain(sections.softtext_pass.iter())
        .chain(sections.other_pass.iter())
        .map(|l| collapse_spaces(l))
        .filter(|l| !l.is_empty() && seen.insert(l.clone()))
        .collect();

    let window_of = |i: usize| all_lines[i..(i + 3).min(all_lines.len())].join(" | ");

    let mut candidates = Vec::new();
    for (i, line) in all_lines.iter().enumerate() {
        if !STRONG_LABELS.is_match(line) {
            continue;
        }

        if let Some(&value) = amounts(line, true).last() {
            let (score, mut why) = score_candidate(value, line, true, tax);
            why.push("Strong label match (same line)");
            candidates.push(candidate((score + 0.10).min(1.0), value, &why, line));
            continue;
        }

        let window = window_of(i);
        for value in amounts(&window, true) {
            let (score, mut why) = score_candidate(value, &window, true, tax);
            why.push("Strong label match");
            candidates.push(candidate((score + 0.05).min(1.0), value, &why, &window));
        }
    }
    if let Some(guess) = pick(candidates) {
        return guess;
    }

    let mut candidates = Vec::new();
    for (i, line) in all_lines.iter().enumerate() {
        if !WEAK_LABEL.is_match(line) || is_bad_context(line) {
            continue;
        }
        let window = window_of(i);
        for value in amounts(&window, true) {
            let (score, mut why) = score_candidate(value, &window, true, tax);
            why.push("Weak label match");
            candidates.push(candidate((score + 0.03).min(1.0), value, &why, &window));
        }
    }
    if let Some(guess) = pick(candidates) {
        return guess;
    }

    let mut candidates = Vec::new();
    for line in all_lines.iter().filter(|l| !is_bad_context(l)) {
        for value in amounts(line, false) {
            let (score, why) = score_candidate(value, line, false, tax);
            candidates.push(candidate(score, value, &why, line));
        }
    }

    if candidates.is_empty() {
        for line in all_lines.iter().filter(|l| !ITEM_MATH.is_match(&l.to_lowercase())) {
            for value in amounts(line, false) {
                let (score, mut why) = score_candidate(value, line, false, tax);
                why.push("Loosened context filter");
                candidates.push(candidate((score - 0.05).max(0.0), value, &why, line));
            }
        }
    }

    pick(candidates).unwrap_or(TotalGuess {
        value: None,
        confidence: 0.0,
        reasoning: "No money candidates found.".to_string(),
    })
}
