//! Purchase date extraction

use std::collections::HashSet;
use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::{Captures, Regex};

use super::text::{clamp01, contains_any, line_window, to_conf_100, Sections};

const DATE_LABELS: &[&str] = &[
    "date", "dated", "txn date", "trans date", "transaction date", "purchase date", "issued",
    "invoice date",
];

const MONTHS: &str = "jan|january|feb|february|mar|march|apr|april|may|jun|june|jul|july|aug|august|sep|sept|september|oct|october|nov|november|dec|december";

#[derive(Clone, Copy)]
enum Layout {
    Numeric,
    MonthName,
}

static DATE_PATTERNS: LazyLock<Vec<(Regex, &'static str, Layout)>> = LazyLock::new(|| {
    vec![
        (
            Regex::new(r"\b(?P<m>\d{1,2})[/\-](?P<d>\d{1,2})[/\-](?P<y>\d{2,4})\b").unwrap(),
            "mdy_slash",
            Layout::Numeric,
        ),
        (
            Regex::new(r"\b(?P<y>\d{4})[/\-](?P<m>\d{1,2})[/\-](?P<d>\d{1,2})\b").unwrap(),
            "ymd_dash",
            Layout::Numeric,
        ),
        (
            Regex::new(&format!(
                r"(?i)\b(?P<mon>{MONTHS})\.?\s+(?P<d>\d{{1,2}}),?\s+(?P<y>\d{{2,4}})\b"
            ))
            .unwrap(),
            "mon_d_y",
            Layout::MonthName,
        ),
        (
            Regex::new(&format!(
                r"(?i)\b(?P<d>\d{{1,2}})\s+(?P<mon>{MONTHS})\.?\s+(?P<y>\d{{2,4}})\b"
            ))
            .unwrap(),
            "d_mon_y",
            Layout::MonthName,
        ),
    ]
});

#[derive(Debug, Clone, PartialEq)]
pub struct DateGuess {
    pub iso: Option<String>,
    pub confidence: f64,
    pub reasoning: String,
}

fn month_number(name: &str) -> Option<u32> {
    let key: String = name.trim_end_matches('.').to_lowercase().chars().take(3).collect();
    let month = match key.as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

/// Two-digit years pivot at 68: `26` is 2026, `87` is 1987
fn expand_year(y: i32) -> i32 {
    match y {
        0..=68 => 2000 + y,
        69..=99 => 1900 + y,
        _ => y,
    }
}

fn date_from_captures(caps: &Captures, layout: Layout) -> Option<NaiveDate> {
    let year = expand_year(caps.name("y")?.as_str().parse().ok()?);
    let day: u32 = caps.name("d")?.as_str().parse().ok()?;
    let month = match layout {
        Layout::Numeric => caps.name("m")?.as_str().parse().ok()?,
        Layout::MonthName => month_number(caps.name("mon")?.as_str())?,
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Valid calendar dates in `text`, first occurrence of each kept
fn date_candidates(text: &str) -> Vec<(NaiveDate, String)> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for (pattern, tag, layout) in DATE_PATTERNS.iter() {
        for caps in pattern.captures_iter(text) {
            let Some(date) = date_from_captures(&caps, *layout) else {
                continue;
            };
            if seen.insert(date) {
                out.push((date, format!("Matched date pattern '{}'.", tag)));
            }
        }
    }
    out
}

/// Same day and month `years` away, falling back to Feb 28 for leap days
fn shift_years(date: NaiveDate, years: i32) -> NaiveDate {
    let year = date.year() + years;
    date.with_year(year)
        .or_else(|| NaiveDate::from_ymd_opt(year, date.month(), 28))
        .unwrap_or(date)
}

pub fn extract_date(lines: &[String], sections: &Sections, today: NaiveDate) -> DateGuess {
    if lines.is_empty() {
        return DateGuess {
            iso: None,
            confidence: 0.0,
            reasoning: "No OCR text.".to_string(),
        };
    }

    let mut candidates: Vec<(NaiveDate, f64, String)> = Vec::new();

    for (i, line) in lines.iter().take(40).enumerate() {
        if !contains_any(line, DATE_LABELS) {
            continue;
        }
        let window = line_window(lines, i, 3);
        for (date, reason) in date_candidates(&window) {
            candidates.push((
                date,
                0.86,
                format!("{} Found near date label in: '{}'.", reason, line),
            ));
        }
    }

    let mut blocks: Vec<(&str, String, f64)> = Vec::new();
    if !sections.numeric_pass.is_empty() {
        blocks.push(("numeric_pass", sections.numeric_pass.join("\n"), 0.74));
    }
    blocks.push(("top_full", lines[..lines.len().min(35)].join("\n"), 0.70));
    blocks.push(("full", lines.join("\n"), 0.62));

    for (name, block, base) in &blocks {
        for (date, reason) in date_candidates(block) {
            candidates.push((date, *base, format!("{} Found by scan in {}.", reason, name)));
        }
    }

    if candidates.is_empty() {
        return DateGuess {
            iso: None,
            confidence: 0.0,
            reasoning: "No date pattern detected.".to_string(),
        };
    }

    let far_future = shift_years(today, 2);
    let very_old = shift_years(today, -15);
    let recent = shift_years(today, -2);

    let mut best: Option<(NaiveDate, f64, String)> = None;
    for (date, mut score, mut reason) in candidates {
        if date > far_future {
            score -= 0.35;
            reason.push_str(" Penalized: implausible far-future date.");
        }
        if date < very_old {
            score -= 0.15;
            reason.push_str(" Penalized: very old date.");
        }
        if recent <= date && date <= today {
            score += 0.04;
        }

        let score = clamp01(score);
        if best.as_ref().map_or(true, |(_, s, _)| score > *s) {
            best = Some((date, score, reason));
        }
    }

    match best {
        Some((date, score, reason)) => DateGuess {
            iso: Some(date.format("%Y-%m-%d").to_string()),
            confidence: to_conf_100(score),
            reasoning: reason,
        },
        None => DateGuess {
            iso: None,
            confidence: 0.0,
            reasoning: "Date candidates existed but none were valid.".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(str::to_string).collect()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 1).unwrap()
    }

    #[test]
    fn test_labeled_slash_date() {
        let l = lines("SHELL\nDate: 01/27/26 14:02\nTOTAL 40.00");
        let guess = extract_date(&l, &Sections::split(&l), today());
        assert_eq!(guess.iso.as_deref(), Some("2026-01-27"));
        assert_eq!(guess.confidence, 90.0);
        assert!(guess.reasoning.starts_with("Matched date pattern 'mdy_slash'."));
        assert!(guess.reasoning.contains("Found near date label"));
    }

    #[test]
    fn test_month_name_formats() {
        let l = lines("Order placed January 5, 2026");
        let guess = extract_date(&l, &Sections::split(&l), today());
        assert_eq!(guess.iso.as_deref(), Some("2026-01-05"));

        let l = lines("Visit 12 Sept. 2025");
        let guess = extract_date(&l, &Sections::split(&l), today());
        assert_eq!(guess.iso.as_deref(), Some("2025-09-12"));
    }

    #[test]
    fn test_far_future_is_penalized() {
        let l = lines("2031-03-03\n2025-11-30");
        let guess = extract_date(&l, &Sections::split(&l), today());
        assert_eq!(guess.iso.as_deref(), Some("2025-11-30"));
    }

    #[test]
    fn test_invalid_calendar_dates_skipped() {
        let l = lines("13/45/2025 nothing else");
        let guess = extract_date(&l, &Sections::split(&l), today());
        assert!(guess.iso.is_none());
        assert_eq!(guess.reasoning, "No date pattern detected.");
    }

    #[test]
    fn test_two_digit_year_pivot() {
        assert_eq!(expand_year(68), 2068);
        assert_eq!(expand_year(69), 1969);
        assert_eq!(expand_year(2024), 2024);
    }
}
