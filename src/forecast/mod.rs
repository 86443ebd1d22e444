//! Forecasting core: autoregressive rollout and trend classification.

pub mod rollout;
pub mod trend;

pub use rollout::{Rollout, RolloutOutcome, roll_forward};
pub use trend::{TrendReading, TrendSettings, classify_trend};
