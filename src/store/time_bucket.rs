//! Day buckets for the point ledger
//!
//! Days are stored as "YYYY-MM-DD" strings so they sort lexically.

use chrono::{DateTime, NaiveDate, Utc};

const DAY_FORMAT: &str = "%Y-%m-%d";
const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Compute the day bucket string from a Unix timestamp in milliseconds.
pub fn day_bucket(timestamp_ms: i64) -> String {
    let dt = DateTime::from_timestamp_millis(timestamp_ms).unwrap_or_else(Utc::now);
    dt.format(DAY_FORMAT).to_string()
}

/// Parse a day bucket back into a date
pub fn parse_day(bucket: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(bucket, DAY_FORMAT).ok()
}

/// First day bucket inside a window of `days` ending at `now_ms`
pub fn cutoff_day(days: u32, now_ms: i64) -> String {
    day_bucket(now_ms - i64::from(days) * DAY_MS)
}
