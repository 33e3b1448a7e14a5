use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};

use crate::constants::reports::{REPORT_FILE_DATE_FORMAT, REPORT_FILE_EXTENSION};

/// Timestamp layouts seen in report `Date`/`Last Update` fields.
///
/// Two-digit year layouts come first: `%Y` also accepts two digits.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%m/%d/%y %H:%M",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
];

/// Date-only layouts seen in report fields and file names.
///
/// Two-digit year layouts come first: `%Y` also accepts two digits.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m-%d-%Y", "%m/%d/%y", "%m/%d/%Y"];

/// Parse a report date or timestamp, truncating any time-of-day to the day.
///
/// Accepts RFC 3339 (`2020-03-01T00:00:00Z`), ISO dates, and the US-style
/// layouts used by early reports (`3/1/2020 17:00`). Returns `None` when no
/// layout matches.
pub fn parse_report_date(raw: &str) -> Option<NaiveDate> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(value) {
        return Some(stamp.with_timezone(&Utc).date_naive());
    }
    for format in DATETIME_FORMATS {
        if let Ok(stamp) = NaiveDateTime::parse_from_str(value, format) {
            return Some(stamp.date());
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
}

/// File name a day's report is published and cached under (`MM-DD-YYYY.csv`).
pub fn report_file_name(date: NaiveDate) -> String {
    format!(
        "{}.{}",
        date.format(REPORT_FILE_DATE_FORMAT),
        REPORT_FILE_EXTENSION
    )
}

/// Inclusive ascending day range; empty when `from` is after `to`.
pub fn each_day(from: NaiveDate, to: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    from.iter_days().take_while(move |day| *day <= to)
}

/// Calendar day before today in UTC; today's report is assumed incomplete.
pub fn yesterday_utc() -> NaiveDate {
    (Utc::now() - Duration::days(1)).date_naive()
}

/// Whole days from `earlier` to `later`; negative when `earlier` is after `later`.
pub fn days_between(earlier: NaiveDate, later: NaiveDate) -> i64 {
    later.signed_duration_since(earlier).num_days()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_report_dates_and_truncates_timestamps() {
        assert_eq!(parse_report_date("2020-03-01"), Some(ymd(2020, 3, 1)));
        assert_eq!(
            parse_report_date("2020-03-01T23:59:59Z"),
            Some(ymd(2020, 3, 1))
        );
        assert_eq!(
            parse_report_date("2020-03-01T01:00:00+02:00"),
            Some(ymd(2020, 2, 29))
        );
        assert_eq!(
            parse_report_date("2020-03-01 17:43:03"),
            Some(ymd(2020, 3, 1))
        );
        assert_eq!(parse_report_date("1/22/2020 17:00"), Some(ymd(2020, 1, 22)));
        assert_eq!(parse_report_date("1/22/20 17:00"), Some(ymd(2020, 1, 22)));
        assert_eq!(parse_report_date(" 03-01-2020 "), Some(ymd(2020, 3, 1)));
        assert_eq!(parse_report_date(""), None);
        assert_eq!(parse_report_date("not-a-date"), None);
        assert_eq!(parse_report_date("2020-13-01"), None);
    }

    #[test]
    fn report_file_name_uses_month_day_year() {
        assert_eq!(report_file_name(ymd(2020, 1, 22)), "01-22-2020.csv");
        assert_eq!(report_file_name(ymd(2021, 12, 3)), "12-03-2021.csv");
    }

    #[test]
    fn each_day_is_inclusive_and_crosses_month_boundaries() {
        let days: Vec<NaiveDate> = each_day(ymd(2020, 2, 28), ymd(2020, 3, 1)).collect();
        assert_eq!(
            days,
            vec![ymd(2020, 2, 28), ymd(2020, 2, 29), ymd(2020, 3, 1)]
        );
        assert_eq!(each_day(ymd(2020, 3, 1), ymd(2020, 3, 1)).count(), 1);
        assert_eq!(each_day(ymd(2020, 3, 2), ymd(2020, 3, 1)).count(), 0);
    }

    #[test]
    fn days_between_is_signed() {
        assert_eq!(days_between(ymd(2020, 3, 1), ymd(2020, 3, 11)), 10);
        assert_eq!(days_between(ymd(2020, 3, 11), ymd(2020, 3, 1)), -10);
    }

    #[test]
    fn yesterday_is_before_today() {
        assert!(yesterday_utc() < Utc::now().date_naive());
    }
}
