//! Min-max scaling into `[0, 1]`.
//!
//! A scaler is fit once per request over the full history and then reused to
//! de-scale model outputs. It is a plain value: nothing here is shared between
//! requests.

use crate::error::{ForecastError, Result};

/// Fitted `(min, max)` of a series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinMaxScaler {
    min: f64,
    max: f64,
}

impl MinMaxScaler {
    /// Fit over `values`.
    ///
    /// A constant series is an error rather than being clamped to zero: it
    /// carries no signal for the model.
    pub fn fit(values: &[f64]) -> Result<Self> {
        if values.is_empty() {
            return Err(ForecastError::InsufficientHistory {
                needed: 1,
                available: 0,
            });
        }

        let (min, max) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));

        if !(min.is_finite() && max.is_finite()) {
            return Err(ForecastError::InvalidSeries("non-finite value in series".to_string()));
        }
        if max == min {
            return Err(ForecastError::DegenerateRange(min));
        }

        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    fn range(&self) -> f64 {
        self.max - self.min
    }

    pub fn normalize_value(&self, v: f64) -> f64 {
        (v - self.min) / self.range()
    }

    pub fn normalize(&self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|&v| self.normalize_value(v)).collect()
    }

    /// Exact inverse of [`normalize_value`](Self::normalize_value).
    pub fn denormalize(&self, v: f64) -> f64 {
        v * self.range() + self.min
    }
}
