//! Date and time helpers
//!
//! Event dates and times are stored as free-form strings. These helpers
//! parse them for sorting, validation and the daily agenda.

use std::cmp::Ordering;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};

const DATE_FORMAT: &str = "%Y-%m-%d";
const NAIVE_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];
const TIME_FORMATS: &[&str] = &["%I:%M %p", "%I:%M%p", "%H:%M:%S", "%H:%M"];

/// Parse a stored event date.
///
/// Accepts a plain `YYYY-MM-DD`, a naive `YYYY-MM-DDTHH:MM[:SS]`, or an
/// RFC 3339 timestamp (converted to the local calendar date).
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, DATE_FORMAT) {
        return Some(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Some(timestamp.with_timezone(&Local).date_naive());
    }
    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|datetime| datetime.date())
}

pub fn is_valid_date(value: &str) -> bool {
    parse_date(value).is_some()
}

/// Format a stored date as `YYYY-MM-DD`, or `None` when unparseable
pub fn format_date(value: &str) -> Option<String> {
    parse_date(value).map(|date| date.format(DATE_FORMAT).to_string())
}

/// ISO-8601 timestamp with millisecond precision
pub fn to_iso(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// True when `a` is a strictly later calendar date than `b`.
/// Unparseable dates never compare as after or before anything.
pub fn is_after(a: &str, b: &str) -> bool {
    matches!((parse_date(a), parse_date(b)), (Some(a), Some(b)) if a > b)
}

pub fn is_before(a: &str, b: &str) -> bool {
    matches!((parse_date(a), parse_date(b)), (Some(a), Some(b)) if a < b)
}

/// True when the stored date falls on `today`
pub fn is_same_day(value: &str, today: NaiveDate) -> bool {
    parse_date(value) == Some(today)
}

/// True when the stored date falls on the current local calendar date
pub fn is_today(value: &str) -> bool {
    is_same_day(value, today())
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse a free-form event time such as `9:00 AM`, `2pm` or `14:30`
pub fn parse_time(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(value, format).ok())
        .or_else(|| parse_hour_only(value))
}

/// `2pm`, `11 AM`: chrono needs minutes, so bare hours are handled here
fn parse_hour_only(value: &str) -> Option<NaiveTime> {
    let lower = value.to_ascii_lowercase();
    let (hour, pm) = if let Some(hour) = lower.strip_suffix("pm") {
        (hour, true)
    } else {
        (lower.strip_suffix("am")?, false)
    };
    let hour: u32 = hour.trim().parse().ok().filter(|h| (1..=12).contains(h))?;
    let hour = match (hour, pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, true) => h + 12,
        (h, false) => h,
    };
    NaiveTime::from_hms_opt(hour, 0, 0)
}

/// Order two dates for listing: parsed dates chronologically, unparseable
/// ones after all parsed dates.
pub fn compare_dates(a: &str, b: &str) -> Ordering {
    match (parse_date(a), parse_date(b)) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}
