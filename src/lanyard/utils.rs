//! Lanyard utility functions
//!
//! User ID validation plus the time helpers shared by the formatters.

use chrono::DateTime;

use crate::config::lanyard::{USER_ID_MAX_LEN, USER_ID_MIN_LEN};
use crate::error::ValidationError;

/// Validate a Discord user ID (snowflake) before it is placed in a URL path
///
/// Accepts only ASCII digits with a length of 17 to 20. Nothing is trimmed:
/// surrounding whitespace is rejected like any other non-digit.
pub fn sanitize_user_id(raw: &str) -> std::result::Result<&str, ValidationError> {
    let invalid = |reason: String| ValidationError::InvalidUserId { reason };

    if raw.is_empty() {
        return Err(invalid("value is empty".to_string()));
    }

    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid("contains non-digit characters".to_string()));
    }

    if !(USER_ID_MIN_LEN..=USER_ID_MAX_LEN).contains(&raw.len()) {
        return Err(invalid(format!("has {} digits", raw.len())));
    }

    Ok(raw)
}

/// Format an epoch-millisecond timestamp as `YYYY-MM-DD HH:MM:SS UTC`
pub fn format_timestamp(timestamp_ms: i64) -> String {
    match DateTime::from_timestamp_millis(timestamp_ms) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => "Unknown".to_string(),
    }
}

/// Format a millisecond duration as `m:ss` or `h:mm:ss`
pub fn format_duration(duration_ms: i64) -> String {
    let total_secs = duration_ms.max(0) / 1000;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

/// Shorten an upstream body for inclusion in an error message
pub fn truncate_message(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut short: String = text.chars().take(max_chars).collect();
    short.push('…');
    short
}
