//! Calendar-day arithmetic on `YYYY-MM-DD` dates.
//!
//! Dates are plain calendar days: no time zone, no time of day.

use chrono::{Datelike, Duration, NaiveDate};

use crate::error::{ForecastError, Result};

/// The one date format accepted and produced by the core.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` string.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| ForecastError::InvalidDateFormat(s.to_string()))
}

/// Format a date as `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Move a date by `delta_days` (negative moves backwards).
pub fn shift_date(date: NaiveDate, delta_days: i64) -> Result<NaiveDate> {
    date.checked_add_signed(Duration::days(delta_days))
        .ok_or_else(|| ForecastError::InvalidDateFormat(format!("{date} shifted by {delta_days} days")))
}

/// String form of [`shift_date`]: parse, shift, format.
pub fn shift(date: &str, delta_days: i64) -> Result<String> {
    let parsed = parse_date(date)?;
    shift_date(parsed, delta_days).map(format_date)
}

/// Proleptic Gregorian ordinal where 0001-01-01 is day 1.
pub fn ordinal(date: NaiveDate) -> i64 {
    i64::from(date.num_days_from_ce())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_crosses_month_and_year_boundaries() {
        assert_eq!(shift("2020-04-30", 1).unwrap(), "2020-05-01");
        assert_eq!(shift("2021-01-01", -1).unwrap(), "2020-12-31");
        assert_eq!(shift("2020-02-28", 1).unwrap(), "2020-02-29");
        assert_eq!(shift("2020-04-10", 0).unwrap(), "2020-04-10");
    }

    #[test]
    fn malformed_dates_are_rejected() {
        for bad in ["2020/04/01", "01-04-2020", "2020-13-01", "", "yesterday"] {
            let err = shift(bad, 1).unwrap_err();
            assert!(matches!(err, ForecastError::InvalidDateFormat(_)), "{bad}: {err}");
        }
    }

    #[test]
    fn ordinal_starts_at_day_one() {
        let first = NaiveDate::from_ymd_opt(1, 1, 1).unwrap();
        assert_eq!(ordinal(first), 1);

        let a = parse_date("2020-04-01").unwrap();
        let b = parse_date("2020-04-11").unwrap();
        assert_eq!(ordinal(b) - ordinal(a), 10);
    }
}
