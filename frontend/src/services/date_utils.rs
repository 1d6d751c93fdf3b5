use chrono::{NaiveDate, Utc};

/// Current time as an RFC 3339 timestamp
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}

/// Current epoch milliseconds
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Identifier derived from the current time, used for records that were
/// never acknowledged by a server
pub fn timestamp_id() -> String {
    now_millis().to_string()
}

/// Parse a YYYY-MM-DD date
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Format a YYYY-MM-DD date for display (e.g., "January 15, 2024")
pub fn format_display_date(value: &str) -> String {
    match parse_iso_date(value) {
        Some(date) => date.format("%B %-d, %Y").to_string(),
        None => value.to_string(),
    }
}
