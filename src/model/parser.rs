// File: src/model/parser.rs
//! Date and time extraction from free-text commands.
//!
//! Everything here is pure. The `*_from` variants take the reference date
//! explicitly; the plain variants read the local wall clock.
use chrono::{Datelike, Duration, Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

/// Weekday names indexed the way the resolution rule counts them (0 = Sunday).
pub const WEEKDAYS: [&str; 7] = [
    "sunday",
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
];

// Order in which weekday names are checked when several appear.
const WEEKDAY_CHECK_ORDER: [usize; 7] = [1, 2, 3, 4, 5, 6, 0];

static TIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:(at|by)\s+)?(\d{1,2})(?::(\d{2}))?\s*(a\.?m\.?|p\.?m\.?)?(?:\b|$)")
        .expect("time pattern")
});

static ISO_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{4}-\d{2}-\d{2})\b").expect("iso date pattern"));

/// A time phrase found in text, with its byte span (including a leading "at"/"by").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeMatch {
    pub start: usize,
    pub end: usize,
    pub display: String,
}

/// Resolves the date mentioned in `text`, defaulting to today.
pub fn extract_date(text: &str) -> NaiveDate {
    extract_date_from(text, Local::now().date_naive())
}

/// Resolves the date mentioned in `text` relative to `today`.
///
/// `today` wins over `tomorrow`, which wins over any weekday name. A weekday
/// always resolves to its next occurrence, so naming today's weekday yields a
/// date seven days out. Without any keyword the result is `today` itself.
pub fn extract_date_from(text: &str, today: NaiveDate) -> NaiveDate {
    find_day_keyword(text, today).unwrap_or(today)
}

/// Like [`extract_date_from`] but reports `None` when no day keyword is present.
pub fn find_day_keyword(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let lower = text.to_lowercase();
    if lower.contains("today") {
        return Some(today);
    }
    if lower.contains("tomorrow") {
        return Some(today + Duration::days(1));
    }
    WEEKDAY_CHECK_ORDER
        .iter()
        .find(|&&idx| lower.contains(WEEKDAYS[idx]))
        .map(|&idx| next_occurrence(today, idx as i64))
}

/// Next occurrence of `target` (0 = Sunday), never `from` itself.
pub fn next_occurrence(from: NaiveDate, target: i64) -> NaiveDate {
    let current = from.weekday().num_days_from_sunday() as i64;
    let mut days = target - current;
    if days <= 0 {
        days += 7;
    }
    from + Duration::days(days)
}

/// First explicit `YYYY-MM-DD` date in the text that is a real calendar date.
pub fn extract_iso_date(text: &str) -> Option<NaiveDate> {
    ISO_DATE_RE
        .captures_iter(text)
        .find_map(|c| NaiveDate::parse_from_str(&c[1], "%Y-%m-%d").ok())
}

pub fn to_iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Extracts a time of day and renders it as `HH:MM AM/PM`.
pub fn extract_time(text: &str) -> Option<String> {
    find_time(text).map(|m| m.display)
}

/// Locates the first plausible time phrase.
///
/// Accepted shapes: `H`, `H:MM`, `Ham`, `H:MM pm`, optionally after "at" or "by".
/// A bare number only counts when it follows "at"/"by", so "3 chapters" is not
/// a time. Hours must be 1..=12.
pub fn find_time(text: &str) -> Option<TimeMatch> {
    for caps in TIME_RE.captures_iter(text) {
        let has_prefix = caps.get(1).is_some();
        let minute_str = caps.get(3);
        let meridiem = caps.get(4).map(|m| m.as_str().to_lowercase());

        if !has_prefix && minute_str.is_none() && meridiem.is_none() {
            continue;
        }

        let Some(whole) = caps.get(0) else {
            continue;
        };
        // Skip digits that are part of a larger token such as a date ("2025-01-16").
        if text[..whole.start()].ends_with(['-', '/', '.', ':']) {
            continue;
        }

        let Ok(hour) = caps[2].parse::<u32>() else {
            continue;
        };
        let minute = match minute_str {
            Some(m) => match m.as_str().parse::<u32>() {
                Ok(v) => v,
                Err(_) => continue,
            },
            None => 0,
        };
        if !(1..=12).contains(&hour) || minute > 59 {
            continue;
        }

        let suffix = match meridiem.as_deref().map(|m| m.starts_with('p')) {
            Some(true) => "PM",
            Some(false) => "AM",
            None => default_meridiem(hour),
        };

        return Some(TimeMatch {
            start: whole.start(),
            end: whole.end(),
            display: format!("{:02}:{:02} {}", hour, minute, suffix),
        });
    }
    None
}

// "at 3" is read as the afternoon, "at 9" as the morning.
fn default_meridiem(hour: u32) -> &'static str {
    match hour {
        8..=11 => "AM",
        _ => "PM",
    }
}
