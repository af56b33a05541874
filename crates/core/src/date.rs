//! Calendar-date helpers shared by the invoice model and the HTTP layer.
//!
//! All report arithmetic works on `NaiveDate`: aging counts whole days and has
//! no time-of-day semantics.

use chrono::{DateTime, Months, NaiveDate};

/// Parse an ISO calendar date.
///
/// Accepts a plain `YYYY-MM-DD` date or a full RFC 3339 timestamp (the date
/// part of the timestamp, in its own offset, is used). Returns `None` for
/// anything else.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.date_naive())
}

/// The same day `months` calendar months earlier, clamped to month end
/// (e.g. 31 May minus 3 months is 28/29 Feb).
pub fn months_before(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_sub_months(Months::new(months)).unwrap_or(NaiveDate::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn parses_plain_dates_and_timestamps() {
        assert_eq!(parse_calendar_date("2024-01-15"), Some(d(2024, 1, 15)));
        assert_eq!(
            parse_calendar_date("2024-02-01T23:30:00+00:00"),
            Some(d(2024, 2, 1))
        );
        assert_eq!(parse_calendar_date(" 2024-03-09 "), Some(d(2024, 3, 9)));
    }

    #[test]
    fn garbage_is_none() {
        assert_eq!(parse_calendar_date(""), None);
        assert_eq!(parse_calendar_date("yesterday"), None);
        assert_eq!(parse_calendar_date("2024-13-40"), None);
    }

    #[test]
    fn months_before_clamps_to_month_end() {
        assert_eq!(months_before(d(2024, 5, 31), 3), d(2024, 2, 29));
        assert_eq!(months_before(d(2024, 4, 16), 3), d(2024, 1, 16));
    }
}
