//! Timestamp helpers for the two-digit-year broker log format.

use chrono::{NaiveDate, NaiveDateTime};

/// Parse a `YY/MM/DD HH:MM:SS` token; the two-digit year is 2000+YY.
pub fn parse_log_datetime(s: &str) -> Option<NaiveDateTime> {
    let (date_part, time_part) = s.split_once(' ')?;
    let mut date_fields = date_part.split('/');
    let yy: i32 = date_fields.next()?.parse().ok()?;
    let month: u32 = date_fields.next()?.parse().ok()?;
    let day: u32 = date_fields.next()?.parse().ok()?;

    let mut time_fields = time_part.split(':');
    let hour: u32 = time_fields.next()?.parse().ok()?;
    let minute: u32 = time_fields.next()?.parse().ok()?;
    let second: u32 = time_fields.next()?.parse().ok()?;

    NaiveDate::from_ymd_opt(2000 + yy, month, day)?.and_hms_opt(hour, minute, second)
}

/// Milliseconds since the Unix epoch, treating the naive timestamp as UTC.
///
/// Only used for ordering and identity keys, so the fixed offset is
/// harmless as long as it is applied consistently.
pub fn epoch_ms(t: NaiveDateTime) -> i64 {
    t.and_utc().timestamp_millis()
}

/// Calendar-day key, `YYYY-MM-DD`.
pub fn date_key(t: NaiveDateTime) -> String {
    t.format("%Y-%m-%d").to_string()
}

/// Render a millisecond duration the way the journal displays hold times:
/// `1時間5分`, `3分20秒`, `45秒`. Seconds are omitted once hours are
/// present; a zero or negative duration renders as `0秒`.
pub fn humanize_ms(ms: i64) -> String {
    if ms < 0 {
        return String::new();
    }
    let total_secs = ms / 1000;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    let mut parts = String::new();
    if hours > 0 {
        parts.push_str(&format!("{}時間", hours));
    }
    if minutes > 0 {
        parts.push_str(&format!("{}分", minutes));
    }
    if seconds > 0 && hours == 0 {
        parts.push_str(&format!("{}秒", seconds));
    }
    if parts.is_empty() {
        parts.push_str("0秒");
    }
    parts
}
