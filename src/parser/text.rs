//! Text normalization and section splitting shared by the field extractors

/// Drop non-printable characters, collapse whitespace per line, drop empty lines
pub fn normalize_text(text: &str) -> String {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    text.split('\n')
        .map(|line| {
            let printable: String = line
                .chars()
                .filter(|c| *c == '\t' || (' '..='~').contains(c))
                .collect();
            printable.split_whitespace().collect::<Vec<_>>().join(" ")
        })
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn clamp01(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}

/// Score in 0..1 to a confidence in 0..100 with one decimal
pub fn to_conf_100(x: f64) -> f64 {
    (clamp01(x) * 1000.0).round() / 10.0
}

pub fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    let lower = haystack.to_lowercase();
    needles.iter().any(|n| lower.contains(n))
}

/// Lines `idx - radius ..= idx + radius` joined with " | "
pub fn line_window(lines: &[String], idx: usize, radius: usize) -> String {
    let start = idx.saturating_sub(radius);
    let end = (idx + radius + 1).min(lines.len());
    lines[start..end].join(" | ")
}

/// Keep letters, digits and a little punctuation useful in merchant names
pub fn strip_noise(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, ' ' | '\'' | '&' | '.' | '-' | '/') {
                c
            } else {
                ' '
            }
        })
        .collect::<String>()
        .trim()
        .to_string()
}

pub fn collapse_spaces(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Substring of `text` around `start..end`, widened by `radius` bytes and
/// snapped to char boundaries
pub fn neighborhood(text: &str, start: usize, end: usize, radius: usize) -> &str {
    let mut lo = start.saturating_sub(radius);
    while !text.is_char_boundary(lo) {
        lo -= 1;
    }
    let mut hi = (end + radius).min(text.len());
    while !text.is_char_boundary(hi) {
        hi += 1;
    }
    &text[lo..hi]
}

/// OCR output split by the multi-pass section headers
#[derive(Debug, Default, Clone)]
pub struct Sections {
    pub vendor_pass: Vec<String>,
    pub totals_pass: Vec<String>,
    pub numeric_pass: Vec<String>,
    pub softtext_pass: Vec<String>,
    pub other_pass: Vec<String>,
}

#[derive(Clone, Copy)]
enum Section {
    Full,
    Vendor,
    Totals,
    Numeric,
    SoftText,
    Other,
}

impl Sections {
    pub fn split(lines: &[String]) -> Self {
        let mut sections = Sections::default();
        let mut current = Section::Full;

        for line in lines {
            let upper = line.to_uppercase();
            if line.contains("-----") && upper.contains("PASS") {
                current = if upper.contains("VENDOR") {
                    Section::Vendor
                } else if upper.contains("TOTAL") {
                    Section::Totals
                } else if upper.contains("NUMERIC") {
                    Section::Numeric
                } else if upper.contains("SOFT TEXT") || upper.contains("SOFTTEXT") {
                    Section::SoftText
                } else {
                    Section::Other
                };
                continue;
            }

            let bucket = match current {
                Section::Full => continue,
                Section::Vendor => &mut sections.vendor_pass,
                Section::Totals => &mut sections.totals_pass,
                Section::Numeric => &mut sections.numeric_pass,
                Section::SoftText => &mut sections.softtext_pass,
                Section::Other => &mut sections.other_pass,
            };
            bucket.push(line.clone());
        }

        sections
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(str::to_string).collect()
    }

    #[test]
    fn test_normalize_text_strips_and_collapses() {
        let raw = "  WALMART\r\n\r\nTOTAL   12.34 \u{2014}\n\t\n";
        assert_eq!(normalize_text(raw), "WALMART\nTOTAL 12.34");
    }

    #[test]
    fn test_to_conf_100_rounds_to_one_decimal() {
        assert_eq!(to_conf_100(0.8761), 87.6);
        assert_eq!(to_conf_100(1.4), 100.0);
        assert_eq!(to_conf_100(-0.2), 0.0);
    }

    #[test]
    fn test_split_sections() {
        let text = lines(
            "STORE\nTOTAL 5.00\n----- VENDOR PASS (TOP STRIP) -----\nAUTOZONE\n\
             ----- TOTALS PASS (RIGHT STRIP MIXED) -----\nTOTAL 5.00\n\
             ----- NUMERIC PASS (FULL) -----\n5.00\n----- SOFT TEXT PASS (FULL) -----\nAutoZone",
        );
        let sections = Sections::split(&text);
        assert_eq!(sections.vendor_pass, vec!["AUTOZONE"]);
        assert_eq!(sections.totals_pass, vec!["TOTAL 5.00"]);
        assert_eq!(sections.numeric_pass, vec!["5.00"]);
        assert_eq!(sections.softtext_pass, vec!["AutoZone"]);
        assert!(sections.other_pass.is_empty());
    }

    #[test]
    fn test_neighborhood_clamps_to_text() {
        let text = "abc 1234 def";
        assert_eq!(neighborhood(text, 4, 8, 2), "c 1234 d");
        assert_eq!(neighborhood(text, 0, 3, 20), text);
    }
}
