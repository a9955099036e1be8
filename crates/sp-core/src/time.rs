//! Time utilities for shellport
//!
//! Provides common time-related operations used across crates.

use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Local};

/// Format used for diagnostic log prefixes.
pub const LOG_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Get the current Unix timestamp in milliseconds.
///
/// Returns 0 if the system clock is before the Unix epoch.
pub fn current_time_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Render a local time the way log lines are prefixed (`2024-01-31 14:05:09`).
pub fn format_log_timestamp(at: &DateTime<Local>) -> String {
    at.format(LOG_TIMESTAMP_FORMAT).to_string()
}

/// Current local time as a log prefix.
pub fn log_timestamp() -> String {
    format_log_timestamp(&Local::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_current_time_millis_is_positive() {
        assert!(current_time_millis() > 0);
    }

    #[test]
    fn test_format_log_timestamp() {
        let at = Local.with_ymd_and_hms(2024, 1, 31, 14, 5, 9).unwrap();
        assert_eq!(format_log_timestamp(&at), "2024-01-31 14:05:09");
    }

    #[test]
    fn test_log_timestamp_shape() {
        let stamp = log_timestamp();
        assert_eq!(stamp.len(), 19);
        assert_eq!(&stamp[4..5], "-");
        assert_eq!(&stamp[10..11], " ");
    }
}
