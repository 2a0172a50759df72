//! Vendor extraction
//!
//! Order of preference: known vendor aliases (vendor strip, soft-text pass,
//! top of receipt, whole receipt), then labeled lines ("Sold by: ..."), then
//! the most merchant-looking line near the top.

use std::sync::LazyLock;

use regex::Regex;

use super::text::{clamp01, collapse_spaces, contains_any, strip_noise, to_conf_100, Sections};

/// Canonical vendor names and the spellings OCR tends to produce for them
pub static VENDOR_ALIASES: &[(&str, &[&str])] = &[
    ("Walmart", &["walmart", "wal-mart", "wal mart", "walmrt", "wm supercenter", "wm"]),
    ("Target", &["target", "tgt"]),
    ("Amazon", &["amazon", "amazon.com", "amzn", "amzn mktp", "amzn marketplace"]),
    ("Costco", &["costco", "costco wholesale"]),
    ("Home Depot", &["home depot", "the home depot", "homedepot", "home dep0t", "home-depot"]),
    ("Lowe's", &["lowe's", "lowes", "lowe s"]),
    ("AutoZone", &["autozone", "auto zone", "autozo", "auto z0ne"]),
    ("O'Reilly Auto Parts", &["o'reilly", "oreilly", "o reilly", "oreilly auto", "o'reilly auto"]),
    ("Advance Auto Parts", &["advance auto", "advanceautoparts", "advance auto parts", "adv auto"]),
    ("CVS", &["cvs", "cvs/pharmacy", "cvs pharmacy"]),
    ("Walgreens", &["walgreens", "walgreeens", "walgreen"]),
    ("Dollar General", &["dollar general", "dollargeneral", "dg"]),
    ("Shell", &["shell"]),
    ("Exxon", &["exxon", "esso"]),
    ("Chevron", &["chevron"]),
    ("Sunoco", &["sunoco"]),
    ("BP", &["bp", "b p"]),
    ("7-Eleven", &["7-eleven", "7 eleven", "seven eleven"]),
    ("Starbucks", &["starbucks", "sbux"]),
    ("McDonald's", &["mcdonalds", "mc donalds", "mc donald's", "mcd"]),
];

/// Labels that mark a line as something other than the merchant name
const NON_VENDOR_LABELS: &[&str] = &[
    "total", "sale total", "grand total", "invoice total", "total due", "order total", "sales tax",
    "tax", "vat", "gst", "hst", "date", "dated", "txn date", "trans date", "transaction date",
    "purchase date", "issued", "invoice date", "subtotal", "sub total",
];

const ADDRESS_HINTS: &[&str] = &[
    "street", " st ", " st.", "road", " rd", " rd.", "ave", "suite", "phone", "tel", "www", ".com",
    "@",
];

static ALIAS_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-z0-9']{3,}").unwrap());
static LABELED_VENDOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(from|sold by|merchant|seller)\s*[:\-]\s*(.+)$").unwrap()
});
static MERCHANT_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(merchant)\b\s+(.+)$").unwrap());

#[derive(Debug, Clone, PartialEq)]
pub struct VendorGuess {
    pub name: Option<String>,
    pub confidence: f64,
    pub reasoning: String,
    pub source: Option<String>,
}

impl VendorGuess {
    fn none(reasoning: &str) -> Self {
        Self {
            name: None,
            confidence: 0.0,
            reasoning: reasoning.to_string(),
            source: None,
        }
    }
}

fn alnum_only(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

/// Forgiving alias match: substring, punctuation-insensitive substring, or a
/// token sharing the alias' first four characters with a similar length
fn alias_hit(alias: &str, haystack: &str) -> bool {
    let alias = alias.trim().to_lowercase();
    let haystack = haystack.to_lowercase();
    if alias.is_empty() || haystack.is_empty() {
        return false;
    }

    if haystack.contains(&alias) {
        return true;
    }

    let alias_norm = alnum_only(&alias);
    if !alias_norm.is_empty() && alnum_only(&haystack).contains(&alias_norm) {
        return true;
    }

    let prefix: String = alias_norm.chars().take(4).collect();
    if prefix.is_empty() {
        return false;
    }
    ALIAS_TOKEN.find_iter(&haystack).any(|token| {
        let token_norm = alnum_only(token.as_str());
        !token_norm.is_empty()
            && token_norm.starts_with(&prefix)
            && token_norm.len().abs_diff(alias_norm.len()) <= 4
    })
}

pub fn extract_vendor(lines: &[String], sections: &Sections) -> VendorGuess {
    if lines.is_empty() {
        return VendorGuess::none("No OCR lines.");
    }

    let top_full = &lines[..lines.len().min(14)];

    let mut spaces: Vec<(&str, String)> = Vec::new();
    if !sections.vendor_pass.is_empty() {
        spaces.push(("vendor_pass", sections.vendor_pass.join("\n").to_lowercase()));
    }
    if !sections.softtext_pass.is_empty() {
        spaces.push(("softtext_pass", sections.softtext_pass.join("\n").to_lowercase()));
    }
    spaces.push(("top_full", top_full.join("\n").to_lowercase()));
    spaces.push(("full", lines.join("\n").to_lowercase()));

    let mut best: Option<(&str, &str, String)> = None;
    let mut best_score = 0.0;

    for (space, haystack) in &spaces {
        for (canonical, aliases) in VENDOR_ALIASES {
            for alias in aliases.iter() {
                if !alias_hit(alias, haystack) {
                    continue;
                }
                let mut score = 0.84;
                score += match *space {
                    "vendor_pass" => 0.10,
                    "softtext_pass" => 0.06,
                    "top_full" => 0.04,
                    _ => 0.0,
                };
                if haystack.contains(&canonical.to_lowercase()) {
                    score += 0.03;
                }
                let score = clamp01(score);
                if score > best_score {
                    best_score = score;
                    best = Some((canonical, alias, format!("alias_match:{}", space)));
                }
            }
        }

        if best.is_some() && best_score >= 0.92 && matches!(*space, "vendor_pass" | "softtext_pass")
        {
            break;
        }
    }

    if let Some((canonical, alias, source)) = best {
        return VendorGuess {
            name: Some(canonical.to_string()),
            confidence: to_conf_100(best_score),
            reasoning: format!("Matched vendor alias '{}' in {}.", alias, source),
            source: Some(source),
        };
    }

    for line in lines.iter().take(20) {
        for pattern in [&*LABELED_VENDOR, &*MERCHANT_LINE] {
            let Some(caps) = pattern.captures(line) else {
                continue;
            };
            let candidate = collapse_spaces(&strip_noise(caps[2].trim()));
            if (2..=50).contains(&candidate.len()) {
                return VendorGuess {
                    name: Some(candidate),
                    confidence: to_conf_100(0.68),
                    reasoning: format!("Found vendor in labeled line: '{}'.", line),
                    source: Some("labeled_vendor".to_string()),
                };
            }
        }
    }

    let mut best_line: Option<&String> = None;
    let mut best_line_score = 0.0;
    for line in top_full {
        let lower = line.to_lowercase();
        if contains_any(&lower, NON_VENDOR_LABELS) || ADDRESS_HINTS.iter().any(|k| lower.contains(k))
        {
            continue;
        }

        let length = line.chars().count();
        if !(3..=55).contains(&length) {
            continue;
        }
        let alpha = line.chars().filter(|c| c.is_alphabetic()).count();
        let digit = line.chars().filter(|c| c.is_ascii_digit()).count();
        let upper = line.chars().filter(|c| c.is_uppercase()).count();

        let mut score: f64 = 0.0;
        if alpha >= 4 {
            score += 0.30;
        }
        if digit > alpha {
            score -= 0.20;
        }
        if alpha > 0 && upper as f64 / alpha as f64 >= 0.60 {
            score += 0.12;
        }
        if (1..=4).contains(&line.split_whitespace().count()) {
            score += 0.10;
        }

        let score = clamp01(score);
        if score > best_line_score {
            best_line_score = score;
            best_line = Some(line);
        }
    }

    if let Some(line) = best_line {
        return VendorGuess {
            name: Some(collapse_spaces(&strip_noise(line))),
            confidence: to_conf_100(0.30 + best_line_score * 0.30),
            reasoning: format!(
                "Fallback vendor guess from early merchant-like line: '{}'.",
                line
            ),
            source: Some("heuristic_top_line".to_string()),
        };
    }

    VendorGuess::none("No reliable vendor signal found.")
}
