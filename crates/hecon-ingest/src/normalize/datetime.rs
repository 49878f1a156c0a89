//! Timestamp parsing for discharge extracts.
//!
//! Hospital exports mix ISO timestamps with day-first dates. Day-first is
//! tried before month-first, so `03/04/2025` reads as 3 April.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Parse a timestamp cell, returning `None` for empty or unrecognized input.
///
/// Date-only values resolve to midnight.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    try_parse_datetime(trimmed).or_else(|| try_parse_date(trimmed).map(|d| d.and_time(NaiveTime::MIN)))
}

/// Parse a date cell, discarding any time component.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    parse_timestamp(value).map(|dt| dt.date())
}

/// Try to parse full datetime formats.
fn try_parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let formats = [
        "%Y-%m-%dT%H:%M:%S%.f", // With fractional seconds
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%d/%m/%Y %H:%M:%S", // Day-first
        "%d/%m/%Y %H:%M",
        "%m/%d/%Y %H:%M:%S", // Month-first
        "%m/%d/%Y %H:%M",
    ];

    for fmt in &formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt);
        }
    }

    None
}

/// Try to parse date-only formats.
fn try_parse_date(value: &str) -> Option<NaiveDate> {
    let formats = [
        "%Y-%m-%d",
        "%Y/%m/%d",
        "%d/%m/%Y", // Day-first: 15/01/2025
        "%m/%d/%Y", // Month-first: 01/15/2025
        "%d-%m-%Y", // 15-01-2025
    ];

    for fmt in &formats {
        if let Ok(d) = NaiveDate::parse_from_str(value, fmt) {
            return Some(d);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_iso_and_day_first() {
        assert_eq!(parse_date("2025-01-15"), Some(ymd(2025, 1, 15)));
        assert_eq!(parse_date("15/01/2025"), Some(ymd(2025, 1, 15)));
        assert_eq!(parse_date("2025-01-15 08:30:00"), Some(ymd(2025, 1, 15)));
        assert_eq!(parse_date("2025-01-15T08:30:00"), Some(ymd(2025, 1, 15)));
    }

    #[test]
    fn falls_back_to_month_first() {
        // 13 cannot be a month, so day-first fails and month-first applies.
        assert_eq!(parse_date("01/13/2025"), Some(ymd(2025, 1, 13)));
    }

    #[test]
    fn keeps_time_component() {
        let dt = parse_timestamp("2025-02-01 23:15:00").unwrap();
        assert_eq!(dt.format("%H:%M").to_string(), "23:15");
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("not a date").is_none());
        assert!(parse_timestamp("2025-13-01").is_none());
    }
}
