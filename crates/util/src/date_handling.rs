//! # Date Handling Utilities
//!
//! Timestamps are displayed in ISO 8601 form: UTC, millisecond precision,
//! `Z` suffix.

use chrono::{DateTime, SecondsFormat, Utc};

/// Formats a timestamp for table cells.
///
/// # Example
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use flowdash_util::format_timestamp;
///
/// let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
/// assert_eq!(format_timestamp(&at), "2023-11-14T22:13:20.123Z");
/// ```
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_default_formats_as_unix_zero() {
        assert_eq!(format_timestamp(&DateTime::<Utc>::default()), "1970-01-01T00:00:00.000Z");
    }
}
