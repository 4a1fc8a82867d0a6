//! Utility functions for the price_forecast crate

use chrono::{DateTime, Duration, Utc};

/// Contiguous daily timestamps starting the day after `last_timestamp`
pub fn future_daily_timestamps(last_timestamp: DateTime<Utc>, horizon: usize) -> Vec<DateTime<Utc>> {
    (1..=horizon as i64)
        .map(|day| last_timestamp + Duration::days(day))
        .collect()
}

/// Parsing of the timestamp formats found in spreadsheet exports
pub mod date_parser {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

    const DATETIME_FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];

    const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

    /// Parse a timestamp, interpreting naive values as UTC.
    ///
    /// Returns `None` when no known format matches.
    pub fn parse_date(input: &str) -> Option<DateTime<Utc>> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
            return Some(dt.with_timezone(&Utc));
        }

        for format in DATETIME_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
                return Some(Utc.from_utc_datetime(&naive));
            }
        }

        DATE_FORMATS.iter().find_map(|format| {
            NaiveDate::parse_from_str(input, format)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|naive| Utc.from_utc_datetime(&naive))
        })
    }
}
