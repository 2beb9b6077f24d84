//! Post timestamp text stamped onto shared images.

use chrono::{DateTime, Local, TimeZone};

/// Format `at` as `D/M H:MM`: day, month and hour unpadded, minutes padded.
///
/// `5 March, 14:07` becomes `"5/3 14:07"`.
pub fn stamp_text<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%-d/%-m %-H:%M").to_string()
}

/// [`stamp_text`] for the current local time.
pub fn stamp_text_now() -> String {
    stamp_text(&Local::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_stamp_text_format() {
        let at = Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 0).unwrap();
        assert_eq!(stamp_text(&at), "5/3 14:07");
    }

    #[test]
    fn test_stamp_text_unpadded_hour_padded_minute() {
        let at = Utc.with_ymd_and_hms(2024, 12, 31, 9, 0, 59).unwrap();
        assert_eq!(stamp_text(&at), "31/12 9:00");
    }

    #[test]
    fn test_stamp_text_midnight() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 5, 0).unwrap();
        assert_eq!(stamp_text(&at), "1/1 0:05");
    }

    #[test]
    fn test_stamp_text_now_shape() {
        let text = stamp_text_now();
        let (date, time) = text.split_once(' ').unwrap();
        assert!(date.contains('/'));
        assert_eq!(time.split_once(':').unwrap().1.len(), 2);
    }
}
