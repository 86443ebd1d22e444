//! `case-forecast` library crate.
//!
//! Autoregressive forecasting of daily new case counts per region.
//! The binary (`cf`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the pipeline can be embedded behind other front-ends

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod forecast;
pub mod io;
pub mod math;
pub mod models;
pub mod report;

pub use app::pipeline::{ForecastRun, forecast, run_forecast};
