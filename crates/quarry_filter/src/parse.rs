//! Lenient number and date/time parsing for cell text.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::OnceLock;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Parse a number, ignoring surrounding whitespace and thousands commas.
///
/// ```
/// use quarry_filter::parse_number;
///
/// assert_eq!(parse_number(" 1,250.5 "), Some(1250.5));
/// assert_eq!(parse_number("abc"), None);
/// ```
pub fn parse_number(text: &str) -> Option<f64> {
    text.replace(',', "").trim().parse::<f64>().ok()
}

/// Whether text resembles a date or time.
///
/// True for digit groups separated by `-` or `/` (`2024-01-31`, `1/2/24`),
/// an English month abbreviation, or any letter `t` (date/time separator).
pub fn looks_like_date(text: &str) -> bool {
    static NUMERIC_DATE: OnceLock<Regex> = OnceLock::new();
    static MONTH_NAME: OnceLock<Regex> = OnceLock::new();

    let text = text.trim().to_lowercase();
    let numeric = NUMERIC_DATE.get_or_init(|| {
        Regex::new(r"\d{1,4}[-/]\d{1,2}[-/]\d{1,4}").expect("valid numeric date regex")
    });
    let month = MONTH_NAME.get_or_init(|| {
        Regex::new(r"\b(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)\b")
            .expect("valid month name regex")
    });

    numeric.is_match(&text) || month.is_match(&text) || text.contains('t')
}

fn fixed_layout() -> &'static Regex {
    static LAYOUT: OnceLock<Regex> = OnceLock::new();
    LAYOUT.get_or_init(|| {
        Regex::new(
            r"^(\d{4}-\d{1,2}-\d{1,2}|\d{1,2}/\d{1,2}/\d{4})((\s+|T)\d{1,2}:\d{1,2}(:\d{1,2}(\.\d{1,9})?)?)?$",
        )
        .expect("valid date layout regex")
    })
}

/// Parse a date or date/time.
///
/// Patterns are tried in a fixed order and the first that fits wins:
/// `YYYY-MM-DD`, `DD/MM/YYYY`, `MM/DD/YYYY` (each alone or followed by
/// `HH:MM` or `HH:MM:SS`), then ISO `YYYY-MM-DDTHH:MM[:SS[.fff]]`, then
/// RFC 3339 with an offset (kept as wall-clock time). Day-first is tried
/// before month-first, so `01/02/2024` is the 1st of February.
///
/// Years are exactly four digits and a date is separated from its time by
/// whitespace or `T`. A lowercase `t` separator is accepted, as is a space
/// after `T`.
pub fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    let normalized = text.trim().replace('t', "T").replace("T ", "T");
    let rfc3339 = || {
        DateTime::parse_from_rfc3339(&normalized)
            .ok()
            .map(|dt| dt.naive_local())
    };
    if !fixed_layout().is_match(&normalized) {
        return rfc3339();
    }

    let date_only = |fmt: &&str| {
        NaiveDate::parse_from_str(&normalized, fmt)
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    };
    let with_time = |fmt: &&str| NaiveDateTime::parse_from_str(&normalized, fmt).ok();

    // Same order as the documented pattern list: each date layout alone,
    // then with minutes, then with seconds.
    date_only(&DATE_FORMATS[0])
        .or_else(|| DATETIME_FORMATS[0..2].iter().find_map(with_time))
        .or_else(|| date_only(&DATE_FORMATS[1]))
        .or_else(|| DATETIME_FORMATS[2..4].iter().find_map(with_time))
        .or_else(|| date_only(&DATE_FORMATS[2]))
        .or_else(|| DATETIME_FORMATS[4..].iter().find_map(with_time))
        .or_else(rfc3339)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn test_iso_forms() {
        assert_eq!(parse_datetime("2024-06-01"), Some(at(2024, 6, 1, 0, 0, 0)));
        assert_eq!(parse_datetime("2024-06-01 13:45"), Some(at(2024, 6, 1, 13, 45, 0)));
        assert_eq!(parse_datetime("2024-06-01 13:45:10"), Some(at(2024, 6, 1, 13, 45, 10)));
        assert_eq!(parse_datetime("2024-06-01T13:45"), Some(at(2024, 6, 1, 13, 45, 0)));
        assert_eq!(parse_datetime("2024-06-01t13:45:10"), Some(at(2024, 6, 1, 13, 45, 10)));
        assert_eq!(parse_datetime("2024-06-01T 13:45"), Some(at(2024, 6, 1, 13, 45, 0)));
    }

    #[test]
    fn test_fractional_seconds_and_offset() {
        let parsed = parse_datetime("2024-06-01T13:45:10.250").unwrap();
        assert_eq!(parsed.date(), NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert_eq!(
            parse_datetime("2024-06-01T13:45:10+02:00"),
            Some(at(2024, 6, 1, 13, 45, 10))
        );
    }

    #[test]
    fn test_day_first_wins_when_ambiguous() {
        assert_eq!(parse_datetime("01/02/2024"), Some(at(2024, 2, 1, 0, 0, 0)));
        assert_eq!(parse_datetime("01/02/2024 08:30"), Some(at(2024, 2, 1, 8, 30, 0)));
    }

    #[test]
    fn test_month_first_when_day_first_is_invalid() {
        assert_eq!(parse_datetime("12/31/2024"), Some(at(2024, 12, 31, 0, 0, 0)));
    }

    #[test]
    fn test_unparseable_dates() {
        assert_eq!(parse_datetime(""), None);
        assert_eq!(parse_datetime("yesterday"), None);
        assert_eq!(parse_datetime("2024-13-01"), None);
        assert_eq!(parse_datetime("31/31/2024"), None);
    }

    #[test]
    fn test_year_must_have_four_digits() {
        assert_eq!(parse_datetime("1/2/24"), None);
        assert_eq!(parse_datetime("24-06-01"), None);
        assert_eq!(parse_datetime("02024-06-01"), None);
        assert_eq!(parse_datetime("1/2/2024"), Some(at(2024, 2, 1, 0, 0, 0)));
    }

    #[test]
    fn test_time_needs_a_separator() {
        assert_eq!(parse_datetime("2024-06-0113:45"), None);
        assert_eq!(parse_datetime("01/02/202408:30"), None);
        assert_eq!(parse_datetime("2024-06-01  13:45"), Some(at(2024, 6, 1, 13, 45, 0)));
    }

    #[test]
    fn test_looks_like_date() {
        assert!(looks_like_date("2024-01-31"));
        assert!(looks_like_date("1/2/24"));
        assert!(looks_like_date("15 Mar 2024"));
        assert!(looks_like_date("today"));
        assert!(!looks_like_date("42"));
        assert!(!looks_like_date("1,000.5"));
        assert!(!looks_like_date("march"));
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("5"), Some(5.0));
        assert_eq!(parse_number("-3.25"), Some(-3.25));
        assert_eq!(parse_number("1,000,000"), Some(1_000_000.0));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("12abc"), None);
    }
}
