//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - calendar-day arithmetic on `YYYY-MM-DD` dates (`calendar`)
//! - the input series (`TimeSeries`, `Observation`)
//! - request/config/result types (`ForecastRequest`, `ForecastConfig`, `PredictionResult`, `Trend`)

pub mod calendar;
pub mod types;

pub use types::*;
