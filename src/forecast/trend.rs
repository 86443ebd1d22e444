//! Trend direction from a polynomial smooth of the extended sample matrix.
//!
//! Steps:
//! 1. collect the observed curve: the day before the first row (the last
//!    value of its window), then every labelled row
//! 2. keep points whose `(year, month)` is on/after the onset month
//! 3. fit a degree-`d` polynomial over `(ordinal(date), label)`
//! 4. evaluate it at every kept date
//! 5. compare the last smoothed value with the one `look_back` rows earlier

use chrono::{Datelike, NaiveDate};

use crate::data::SampleStore;
use crate::domain::calendar::{ordinal, shift_date};
use crate::domain::{ForecastConfig, Trend};
use crate::error::{ForecastError, Result};
use crate::math::PolyFit;

/// Trend settings, usually taken from [`ForecastConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendSettings {
    pub onset: NaiveDate,
    pub degree: usize,
    pub tolerance: f64,
}

impl From<&ForecastConfig> for TrendSettings {
    fn from(config: &ForecastConfig) -> Self {
        Self {
            onset: config.onset,
            degree: config.trend_degree,
            tolerance: config.trend_tolerance,
        }
    }
}

impl Default for TrendSettings {
    fn default() -> Self {
        Self::from(&ForecastConfig::default())
    }
}

/// A classified trend plus the smoothed curve it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendReading {
    pub trend: Trend,
    pub dates: Vec<NaiveDate>,
    pub smoothed: Vec<f64>,
}

/// Year/month comparison, so a mid-month onset still admits the whole month.
fn on_or_after_month(date: NaiveDate, onset: NaiveDate) -> bool {
    (date.year(), date.month()) >= (onset.year(), onset.month())
}

/// Classify the trend of `store`'s labels over the last `look_back` days.
pub fn classify_trend(store: &SampleStore, look_back: usize, settings: &TrendSettings) -> Result<TrendReading> {
    // The first row is never rewritten by `extend`, so its window still
    // holds the observed value for the day before it.
    let leading = match store.iter().next().and_then(|(first, row)| row.window.last().map(|&v| (first, v))) {
        Some((first, value)) => Some((shift_date(first, -1)?, value)),
        None => None,
    };

    let (dates, labels): (Vec<NaiveDate>, Vec<f64>) = leading
        .into_iter()
        .chain(store.iter().filter_map(|(date, row)| row.label.map(|label| (date, label))))
        .filter(|(date, _)| on_or_after_month(*date, settings.onset))
        .unzip();

    let needed = (settings.degree + 1).max(look_back + 1);
    if dates.len() < needed {
        return Err(ForecastError::InsufficientHistory {
            needed,
            available: dates.len(),
        });
    }

    let xs: Vec<f64> = dates.iter().map(|&d| ordinal(d) as f64).collect();
    let fit = PolyFit::fit(&xs, &labels, settings.degree)?;
    let smoothed: Vec<f64> = xs.iter().map(|&x| fit.evaluate(x)).collect();

    let ahead = smoothed[smoothed.len() - 1];
    let behind = smoothed[smoothed.len() - 1 - look_back];
    let trend = compare(ahead, behind, settings.tolerance);

    Ok(TrendReading { trend, dates, smoothed })
}

fn compare(ahead: f64, behind: f64, tolerance: f64) -> Trend {
    let scale = 1.0_f64.max(ahead.abs()).max(behind.abs());
    if (ahead - behind).abs() <= tolerance * scale {
        Trend::NotChanged
    } else if ahead > behind {
        Trend::Upward
    } else {
        Trend::Downward
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::Duration;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    /// Daily `values` from `start` as windows of width 1: rows run from the
    /// second day, each window holding the previous day's value.
    fn store_from(start: &str, values: &[f64]) -> SampleStore {
        let start = d(start);
        let dates: Vec<NaiveDate> = (1..values.len()).map(|i| start + Duration::days(i as i64)).collect();
        let windows = values[..values.len() - 1].iter().map(|&v| vec![v]).collect();
        SampleStore::build(&dates, windows, &values[1..]).unwrap()
    }

    #[test]
    fn increasing_series_is_upward() {
        let values: Vec<f64> = (0..15).map(|i| 0.1 * i as f64 + 0.002 * (i * i) as f64).collect();
        let reading = classify_trend(&store_from("2020-04-01", &values), 3, &TrendSettings::default()).unwrap();
        assert_eq!(reading.trend, Trend::Upward);
        assert_eq!(reading.smoothed.len(), 15);
    }

    #[test]
    fn decreasing_series_is_downward() {
        let values: Vec<f64> = (0..15).map(|i| 1.0 - 0.05 * i as f64).collect();
        let reading = classify_trend(&store_from("2020-05-10", &values), 3, &TrendSettings::default()).unwrap();
        assert_eq!(reading.trend, Trend::Downward);
    }

    #[test]
    fn flat_series_is_not_changed() {
        let values = vec![0.42; 12];
        let reading = classify_trend(&store_from("2020-06-01", &values), 4, &TrendSettings::default()).unwrap();
        assert_eq!(reading.trend, Trend::NotChanged);
    }

    #[test]
    fn rows_before_onset_month_are_ignored() {
        // Falling through March, rising from April.
        let mut values: Vec<f64> = (0..10).map(|i| 5.0 - 0.5 * i as f64).collect();
        values.extend((0..10).map(|i| 0.5 + 0.3 * i as f64));
        let store = store_from("2020-03-22", &values);

        let reading = classify_trend(&store, 3, &TrendSettings::default()).unwrap();
        assert_eq!(reading.dates[0], d("2020-04-01"));
        assert_eq!(reading.dates.len(), 10);
        assert_eq!(reading.trend, Trend::Upward);
    }

    #[test]
    fn onset_compares_year_and_month() {
        let onset = d("2020-04-15");
        assert!(on_or_after_month(d("2020-04-01"), onset));
        assert!(on_or_after_month(d("2021-01-05"), onset));
        assert!(!on_or_after_month(d("2020-03-31"), onset));
        assert!(!on_or_after_month(d("2019-12-31"), onset));
    }

    #[test]
    fn unlabelled_rows_are_skipped() {
        let values: Vec<f64> = (0..6).map(|i| i as f64).collect();
        let mut store = store_from("2020-04-01", &values);
        store.extend(d("2020-04-06"), 6.0).unwrap();

        let reading = classify_trend(&store, 2, &TrendSettings::default()).unwrap();
        assert_eq!(reading.dates.len(), 6);
        assert_eq!(reading.dates.last(), Some(&d("2020-04-06")));
    }

    #[test]
    fn too_few_rows_after_filtering() {
        let values = [0.1, 0.2, 0.3, 0.4];
        let err = classify_trend(&store_from("2020-04-01", &values), 1, &TrendSettings::default()).unwrap_err();
        assert!(matches!(
            err,
            ForecastError::InsufficientHistory {
                needed: 5,
                available: 4
            }
        ));
    }

    #[test]
    fn look_back_must_fit_inside_the_curve() {
        let values: Vec<f64> = (0..6).map(|i| i as f64).collect();
        let err = classify_trend(&store_from("2020-04-01", &values), 6, &TrendSettings::default()).unwrap_err();
        assert!(matches!(err, ForecastError::InsufficientHistory { needed: 7, .. }));
    }

    #[test]
    fn curve_starts_at_the_first_window_day() {
        let values: Vec<f64> = (0..8).map(|i| 0.1 * i as f64).collect();
        let store = store_from("2020-04-01", &values);
        assert_eq!(store.len(), 7);

        let reading = classify_trend(&store, 2, &TrendSettings::default()).unwrap();
        assert_eq!(reading.dates.len(), 8);
        assert_eq!(reading.dates[0], d("2020-04-01"));
        assert_abs_diff_eq!(reading.smoothed[0], 0.0, epsilon = 1e-9);
    }

    #[test]
    fn observations_after_a_short_rollout_stay_in_the_curve() {
        let values: Vec<f64> = (0..8).map(|i| 0.1 * i as f64).collect();
        let mut store = store_from("2020-04-01", &values);
        // Two steps from 04-03 rewrite the windows of 04-04 and 04-05 only.
        let next = store.extend(d("2020-04-03"), 0.25).unwrap();
        store.extend(next, 0.35).unwrap();

        let reading = classify_trend(&store, 2, &TrendSettings::default()).unwrap();
        assert_eq!(reading.dates.len(), 8);
        assert!(reading.dates.contains(&d("2020-04-05")));
        assert_eq!(reading.dates.last(), Some(&d("2020-04-08")));
    }

    #[test]
    fn tolerance_is_relative_to_magnitude() {
        assert_eq!(compare(1e6 + 1e-4, 1e6, 1e-9), Trend::NotChanged);
        assert_eq!(compare(1e6 + 1.0, 1e6, 1e-9), Trend::Upward);
        assert_eq!(compare(0.5, 0.5 + 1e-12, 1e-9), Trend::NotChanged);
        assert_eq!(compare(0.4, 0.5, 1e-9), Trend::Downward);
    }
}
