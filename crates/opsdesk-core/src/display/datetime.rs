//! Timestamp formatting in the system timezone.

use std::fmt;

use jiff::{tz::TimeZone, Timestamp};

/// Formats a `Timestamp` as `YYYY-MM-DD HH:MM TZ` in the system timezone.
///
/// Step completions and job updates are stored in UTC; operators read them in
/// local time.
pub struct LocalDateTime<'a>(pub &'a Timestamp);

impl fmt::Display for LocalDateTime<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.0
                .to_zoned(TimeZone::system())
                .strftime("%Y-%m-%d %H:%M %Z")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_datetime_has_date_and_minutes() {
        let ts = Timestamp::from_second(1_767_312_000).unwrap();
        let rendered = LocalDateTime(&ts).to_string();
        // Date part depends on the local zone; the shape does not.
        assert!(rendered.starts_with("2026-01-0"));
        assert_eq!(&rendered[10..11], " ");
    }
}
