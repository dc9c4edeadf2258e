//! Display formatting for backend timestamps.
//!
//! Cosmetic only: an unparsable input yields fixed fallback text instead of
//! an error. Relative phrases bucket on whole calendar days, and the week,
//! month, and year labels are not pluralized.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const FALLBACK: &str = "N/A";

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.naive_utc());
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(parsed);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// "Mar 5, 2026", or the fallback when the input cannot be parsed.
pub fn format_date(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(parsed) => parsed.format("%b %-d, %Y").to_string(),
        None => FALLBACK.to_string(),
    }
}

/// "Mar 5, 2026 2:30 PM", or the fallback when the input cannot be parsed.
pub fn format_date_time(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(parsed) => parsed.format("%b %-d, %Y %-I:%M %p").to_string(),
        None => FALLBACK.to_string(),
    }
}

/// Bucketed relative phrase for a timestamp, measured in whole calendar days
/// from `today`. Future-dated inputs read as "Today".
pub fn relative_time(raw: &str, today: NaiveDate) -> String {
    let Some(parsed) = parse_timestamp(raw) else {
        return FALLBACK.to_string();
    };

    let days = today.signed_duration_since(parsed.date()).num_days();
    if days <= 0 {
        return "Today".to_string();
    }
    if days == 1 {
        return "Yesterday".to_string();
    }
    if days < 7 {
        return format!("{days} days ago");
    }
    if days < 30 {
        return format!("{} weeks ago", days / 7);
    }
    if days < 365 {
        return format!("{} months ago", days / 30);
    }
    format!("{} years ago", days / 365)
}
