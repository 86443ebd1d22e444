//! Date-indexed sample matrix.
//!
//! Each row is keyed by the day its *label* belongs to, not by the last day
//! of its window: the row for `D` holds the `look_back` values for
//! `D - look_back ..= D - 1` and, once known, the value for `D`.
//!
//! Rows live in a `BTreeMap`, so a date owns at most one row and "latest"
//! is simply the last key.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::calendar::shift_date;
use crate::error::{ForecastError, Result};

/// One row of the sample matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRow {
    pub window: Vec<f64>,
    /// Observed or predicted value for the row's date. `None` for the row
    /// a rollout has just opened.
    pub label: Option<f64>,
}

/// A window resolved for a lookup, plus the date it actually came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Lookup {
    pub window: Vec<f64>,
    pub resolved_date: NaiveDate,
    /// True when `resolved_date` differs from the requested date.
    pub fell_back: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SampleStore {
    look_back: usize,
    rows: BTreeMap<NaiveDate, SampleRow>,
}

impl SampleStore {
    /// Build one row per window.
    ///
    /// `dates[i]` must already be the label day of `windows[i]` (the caller
    /// shifts by `look_back`), and `labels[i]` its observed value.
    pub fn build(dates: &[NaiveDate], windows: Vec<Vec<f64>>, labels: &[f64]) -> Result<Self> {
        if dates.len() != windows.len() || labels.len() != windows.len() {
            return Err(ForecastError::InvalidSeries(format!(
                "{} dates, {} windows and {} labels do not line up",
                dates.len(),
                windows.len(),
                labels.len()
            )));
        }
        let look_back = windows.first().map(Vec::len).ok_or(ForecastError::InsufficientHistory {
            needed: 1,
            available: 0,
        })?;
        if look_back == 0 || windows.iter().any(|w| w.len() != look_back) {
            return Err(ForecastError::InvalidSeries("windows must share a non-zero width".to_string()));
        }

        let mut rows = BTreeMap::new();
        for ((&date, window), &label) in dates.iter().zip(windows).zip(labels) {
            let row = SampleRow {
                window,
                label: Some(label),
            };
            if rows.insert(date, row).is_some() {
                return Err(ForecastError::InvalidSeries(format!("duplicate sample date {date}")));
            }
        }

        Ok(Self { look_back, rows })
    }

    pub fn look_back(&self) -> usize {
        self.look_back
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, date: NaiveDate) -> Option<&SampleRow> {
        self.rows.get(&date)
    }

    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.rows.keys().next_back().copied()
    }

    /// Rows in date order.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &SampleRow)> {
        self.rows.iter().map(|(d, r)| (*d, r))
    }

    /// The window for `date`, or the latest row's window when `date` has no row.
    pub fn lookup(&self, date: NaiveDate) -> Result<Lookup> {
        if let Some(row) = self.rows.get(&date) {
            return Ok(Lookup {
                window: row.window.clone(),
                resolved_date: date,
                fell_back: false,
            });
        }

        let (&latest, row) = self.rows.iter().next_back().ok_or(ForecastError::InsufficientHistory {
            needed: 1,
            available: 0,
        })?;
        Ok(Lookup {
            window: row.window.clone(),
            resolved_date: latest,
            fell_back: true,
        })
    }

    /// Record `predicted` as the value for `date` and open the row for the
    /// next day with the window shifted left by one.
    ///
    /// An existing row for the next day gets the new window but keeps its
    /// label, so an observed value inside the history survives the rollout.
    /// Repeating the call never duplicates rows. Returns the next day.
    pub fn extend(&mut self, date: NaiveDate, predicted: f64) -> Result<NaiveDate> {
        let next = shift_date(date, 1)?;

        let row = self
            .rows
            .get_mut(&date)
            .ok_or_else(|| ForecastError::InvalidRequest(format!("no sample row for {date}")))?;
        row.label = Some(predicted);

        let mut window = Vec::with_capacity(self.look_back);
        window.extend_from_slice(&row.window[1..]);
        window.push(predicted);

        let label = self.rows.get(&next).and_then(|r| r.label);
        self.rows.insert(next, SampleRow { window, label });
        Ok(next)
    }
}
