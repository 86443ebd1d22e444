//! Error types.
//!
//! The library reports failures as [`ForecastError`]; the `cf` binary wraps
//! them in [`AppError`], which carries the process exit code:
//!
//! - `2`: bad input (malformed date, unusable request parameters)
//! - `3`: data problem (unknown region, too little history, degenerate series)
//! - `4`: model failure

use thiserror::Error;

/// Failure kinds surfaced by the forecasting core.
///
/// None of these are recovered from inside the crate; they propagate
/// verbatim to the caller.
#[derive(Debug, Error)]
pub enum ForecastError {
    /// A date string did not parse as `YYYY-MM-DD` (or fell off the calendar).
    #[error("invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDateFormat(String),

    /// The series is constant, so min-max scaling would divide by zero.
    #[error("degenerate value range: every value equals {0}")]
    DegenerateRange(f64),

    /// Not enough observations for windowing or trend fitting.
    #[error("insufficient history: need {needed} points, have {available}")]
    InsufficientHistory { needed: usize, available: usize },

    /// The data source (or model store) has nothing for the given code.
    #[error("not found: {0}")]
    NotFound(String),

    /// The external model failed or returned an unusable value.
    #[error("model inference failed: {0}")]
    ModelInference(String),

    /// Request parameters that cannot drive a forecast.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A data source returned a series that breaks the time-series invariants.
    #[error("invalid series: {0}")]
    InvalidSeries(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type with [`ForecastError`].
pub type Result<T> = std::result::Result<T, ForecastError>;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<ForecastError> for AppError {
    fn from(err: ForecastError) -> Self {
        let exit_code = match &err {
            ForecastError::InvalidDateFormat(_) | ForecastError::InvalidRequest(_) => 2,
            ForecastError::DegenerateRange(_)
            | ForecastError::InsufficientHistory { .. }
            | ForecastError::NotFound(_)
            | ForecastError::InvalidSeries(_)
            | ForecastError::Io(_) => 3,
            ForecastError::ModelInference(_) => 4,
        };
        AppError::new(exit_code, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
