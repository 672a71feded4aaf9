//! Clock-string formatting for class start and end times.
//!
//! Start times are stored as elapsed seconds since midnight (the shape a SQL
//! TIME column comes back in), durations as minutes.

const DAY_SECONDS: i64 = 24 * 3600;

/// Format a single elapsed-seconds value as `HH:MM`, wrapping at 24 hours.
pub fn format_clock(seconds: i64) -> String {
    let wrapped = seconds.rem_euclid(DAY_SECONDS);
    format!("{:02}:{:02}", wrapped / 3600, (wrapped % 3600) / 60)
}

/// Compute `(start, end)` clock strings from a start offset and a duration.
///
/// Returns two empty strings when either value is absent, so callers can
/// render classes with incomplete time data without special-casing.
pub fn format_time_range(
    start_seconds: Option<i64>,
    duration_minutes: Option<i64>,
) -> (String, String) {
    let (Some(start), Some(duration)) = (start_seconds, duration_minutes) else {
        return (String::new(), String::new());
    };
    (format_clock(start), format_clock(start + duration * 60))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time_range() {
        assert_eq!(
            format_time_range(Some(6 * 3600), Some(60)),
            ("06:00".to_string(), "07:00".to_string())
        );
        assert_eq!(
            format_time_range(Some(18 * 3600 + 30 * 60), Some(90)),
            ("18:30".to_string(), "20:00".to_string())
        );
    }

    #[test]
    fn test_end_time_wraps_past_midnight() {
        // 23:30 + 90 minutes crosses midnight
        assert_eq!(
            format_time_range(Some(23 * 3600 + 30 * 60), Some(90)),
            ("23:30".to_string(), "01:00".to_string())
        );
    }

    #[test]
    fn test_missing_input_yields_empty_strings() {
        assert_eq!(format_time_range(None, Some(60)), (String::new(), String::new()));
        assert_eq!(format_time_range(Some(3600), None), (String::new(), String::new()));
        assert_eq!(format_time_range(None, None), (String::new(), String::new()));
    }

    #[test]
    fn test_format_clock_wraps() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(DAY_SECONDS + 3600), "01:00");
        assert_eq!(format_clock(-3600), "23:00");
    }
}
