//! Shared domain types.
//!
//! These are kept small and serializable so the same values can be:
//!
//! - threaded through the forecasting pipeline
//! - rendered as JSON for a transport layer
//! - constructed directly in tests

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, Result};

/// One daily observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: f64,
}

/// A chronologically ordered daily series with unique dates.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    points: Vec<Observation>,
}

impl TimeSeries {
    /// Build a series, sorting by date.
    ///
    /// Duplicate dates and non-finite values are rejected rather than
    /// silently merged.
    pub fn new(mut points: Vec<Observation>) -> Result<Self> {
        points.sort_by_key(|p| p.date);

        if let Some(w) = points.windows(2).find(|w| w[0].date == w[1].date) {
            return Err(ForecastError::InvalidSeries(format!(
                "duplicate date {}",
                w[0].date
            )));
        }
        if let Some(p) = points.iter().find(|p| !p.value.is_finite()) {
            return Err(ForecastError::InvalidSeries(format!(
                "non-finite value on {}",
                p.date
            )));
        }

        Ok(Self { points })
    }

    pub fn from_pairs(pairs: impl IntoIterator<Item = (NaiveDate, f64)>) -> Result<Self> {
        Self::new(
            pairs
                .into_iter()
                .map(|(date, value)| Observation { date, value })
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Observation] {
        &self.points
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }
}

/// Direction of the smoothed curve over the last `look_back` days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Upward,
    Downward,
    NotChanged,
}

impl Trend {
    pub fn as_str(self) -> &'static str {
        match self {
            Trend::Upward => "upward",
            Trend::Downward => "downward",
            Trend::NotChanged => "not_changed",
        }
    }
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the caller asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastRequest {
    pub country_code: String,
    /// Raw `YYYY-MM-DD` string; validated by the pipeline.
    pub requested_date: String,
    pub look_forward_days: usize,
}

impl ForecastRequest {
    pub fn new(country_code: impl Into<String>, requested_date: impl Into<String>, look_forward_days: usize) -> Self {
        Self {
            country_code: country_code.into(),
            requested_date: requested_date.into(),
            look_forward_days,
        }
    }
}

/// Modeling knobs that are assumptions rather than invariants.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastConfig {
    /// Model window width. `None` means: the model's declared input length,
    /// else `look_forward_days`.
    pub look_back: Option<usize>,
    /// Trend fitting ignores rows before this month.
    pub onset: NaiveDate,
    /// Degree of the trend polynomial.
    pub trend_degree: usize,
    /// Relative tolerance under which the trend endpoints count as equal.
    pub trend_tolerance: f64,
}

impl ForecastConfig {
    pub const DEFAULT_TREND_DEGREE: usize = 4;
    pub const DEFAULT_TREND_TOLERANCE: f64 = 1e-9;

    /// April 2020, when the outbreak became global.
    pub fn default_onset() -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 4, 1).unwrap_or(NaiveDate::MIN)
    }
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            look_back: None,
            onset: Self::default_onset(),
            trend_degree: Self::DEFAULT_TREND_DEGREE,
            trend_tolerance: Self::DEFAULT_TREND_TOLERANCE,
        }
    }
}

/// The answer to one forecast request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    #[serde(rename = "country_region_code")]
    pub country_code: String,
    /// The day the prediction is for.
    pub prediction_date: NaiveDate,
    /// `prediction_date - look_back` days.
    pub starting_date: NaiveDate,
    /// De-normalized, rounded prediction.
    #[serde(rename = "prediction_new_cases")]
    pub predicted_value: i64,
    pub trend: Trend,
    /// True when the requested date was not in the history and the rollout
    /// started from the latest available date instead.
    pub date_adjusted: bool,
}
