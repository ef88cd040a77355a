//! Timestamp parsing and "time ago" labels.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};

const MS_PER_SECOND: i64 = 1000;
const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Parse a timestamp as sent by the gym APIs.
///
/// Accepts RFC 3339 (with offset) and naive ISO 8601, which is read as
/// local time.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .and_then(|naive| Local.from_local_datetime(&naive).earliest())
        .map(|dt| dt.with_timezone(&Utc))
}

/// Whole seconds between two instants, order-insensitive, rounded down
pub fn elapsed_seconds(now: DateTime<Utc>, then: DateTime<Utc>) -> i64 {
    (now - then).num_milliseconds().abs() / MS_PER_SECOND
}

/// Days between two instants, order-insensitive, rounded up
pub fn elapsed_days(now: DateTime<Utc>, then: DateTime<Utc>) -> i64 {
    let ms = (now - then).num_milliseconds().abs();
    (ms + MS_PER_DAY - 1) / MS_PER_DAY
}

pub fn seconds_ago_label(now: DateTime<Utc>, then: DateTime<Utc>) -> String {
    format!("{} seconds ago", elapsed_seconds(now, then))
}

pub fn days_ago_label(now: DateTime<Utc>, then: DateTime<Utc>) -> String {
    format!("{} day/s ago", elapsed_days(now, then))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn now() -> DateTime<Utc> {
        parse_timestamp("2024-05-04T10:00:00Z").unwrap()
    }

    #[test]
    fn test_parses_rfc3339_with_offset() {
        let dt = parse_timestamp("2024-05-04T20:00:00+10:00").unwrap();
        assert_eq!(dt, now());
    }

    #[test]
    fn test_parses_naive_as_local() {
        let dt = parse_timestamp("2024-05-04T10:00:00.123").unwrap();
        let expected = Local
            .with_ymd_and_hms(2024, 5, 4, 10, 0, 0)
            .earliest()
            .unwrap()
            .with_timezone(&Utc)
            + Duration::milliseconds(123);
        assert_eq!(dt, expected);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(parse_timestamp("yesterday-ish").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn test_seconds_label() {
        let then = now() - Duration::seconds(42);
        assert_eq!(seconds_ago_label(now(), then), "42 seconds ago");
    }

    #[test]
    fn test_seconds_round_down_and_ignore_order() {
        let then = now() - Duration::milliseconds(42_999);
        assert_eq!(elapsed_seconds(now(), then), 42);
        assert_eq!(elapsed_seconds(then, now()), 42);
    }

    #[test]
    fn test_days_label_rounds_up() {
        let then = now() - Duration::days(3) - Duration::hours(2);
        assert_eq!(days_ago_label(now(), then), "4 day/s ago");
    }

    #[test]
    fn test_exact_days_do_not_round_up() {
        let then = now() - Duration::days(3);
        assert_eq!(elapsed_days(now(), then), 3);
        assert_eq!(elapsed_days(now(), now()), 0);
    }
}
