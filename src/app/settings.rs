//! Runtime settings for the `cf` binary.
//!
//! Resolution order (last wins): built-in defaults, `.env` / process
//! environment, CLI flags. The library never reads the environment itself.

use std::path::PathBuf;

use chrono::NaiveDate;

use crate::domain::ForecastConfig;
use crate::domain::calendar::parse_date;
use crate::error::AppError;

pub const ENV_DATA_PATH: &str = "CF_DATA_PATH";
pub const ENV_MODELS_DIR: &str = "CF_MODELS_DIR";
pub const ENV_ONSET: &str = "CF_ONSET";

const DEFAULT_DATA_PATH: &str = "datasets/who_cases_deaths.csv";
const DEFAULT_MODELS_DIR: &str = "models";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub data_path: PathBuf,
    pub models_dir: PathBuf,
    pub onset: NaiveDate,
}

impl Settings {
    /// Read settings from `.env` (if present) and the process environment.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve settings through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let data_path = lookup(ENV_DATA_PATH)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));

        let models_dir = lookup(ENV_MODELS_DIR)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MODELS_DIR));

        let onset = match lookup(ENV_ONSET).filter(|v| !v.trim().is_empty()) {
            Some(raw) => parse_date(&raw).map_err(|e| AppError::new(2, format!("Invalid {ENV_ONSET}: {e}")))?,
            None => ForecastConfig::default_onset(),
        };

        Ok(Self {
            data_path,
            models_dir,
            onset,
        })
    }
}
