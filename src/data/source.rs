//! Where historical series come from.

use std::collections::HashMap;

use crate::domain::TimeSeries;
use crate::error::{ForecastError, Result};

/// Loads the daily series for a region code.
pub trait SeriesSource {
    /// Fails with [`ForecastError::NotFound`] for an unknown code.
    fn load_series(&self, country_code: &str) -> Result<TimeSeries>;
}

/// Series held in memory, keyed by region code.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    series: HashMap<String, TimeSeries>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_series(mut self, country_code: impl Into<String>, series: TimeSeries) -> Self {
        self.insert(country_code, series);
        self
    }

    pub fn insert(&mut self, country_code: impl Into<String>, series: TimeSeries) {
        self.series.insert(country_code.into(), series);
    }
}

impl SeriesSource for InMemorySource {
    fn load_series(&self, country_code: &str) -> Result<TimeSeries> {
        self.series
            .get(country_code)
            .cloned()
            .ok_or_else(|| ForecastError::NotFound(format!("region '{country_code}'")))
    }
}
