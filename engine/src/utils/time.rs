//! Time utility functions

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Naive datetime layouts accepted in addition to RFC 3339
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Parse an ISO 8601-ish date or datetime string to DateTime<Utc>
///
/// Accepts RFC 3339 (`2024-01-01T10:00:00Z`), naive datetimes
/// (`2024-01-01T10:00:00`, `2024-01-01 10:00:00`) which are read as UTC,
/// and plain dates (`2024-01-01`) which resolve to midnight UTC.
pub fn parse_iso_datetime(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
