//! Read/write per-region model files.
//!
//! One trained model per region lives at `<models_dir>/<CODE>-model.json`:
//!
//! ```json
//! { "weights": [0.1, 0.3, 0.6], "bias": 0.0 }
//! ```
//!
//! The window width is the number of weights.

use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{ForecastError, Result};
use crate::models::LinearModel;

/// Path of the model file for `country_code`.
pub fn model_path(models_dir: &Path, country_code: &str) -> PathBuf {
    models_dir.join(format!("{country_code}-model.json"))
}

/// Load and validate the model for `country_code`.
pub fn load_model(models_dir: &Path, country_code: &str) -> Result<LinearModel> {
    if country_code.is_empty() || !country_code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ForecastError::InvalidRequest(format!("invalid region code '{country_code}'")));
    }

    let path = model_path(models_dir, country_code);
    let file = File::open(&path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ForecastError::NotFound(format!("no trained model for region '{country_code}'")),
        _ => ForecastError::Io(e),
    })?;

    let model: LinearModel = serde_json::from_reader(file).map_err(|e| {
        ForecastError::ModelInference(format!("invalid model file '{}': {e}", path.display()))
    })?;
    model.validate()?;
    Ok(model)
}

/// Write `model` as the model for `country_code`.
pub fn write_model(models_dir: &Path, country_code: &str, model: &LinearModel) -> Result<PathBuf> {
    let path = model_path(models_dir, country_code);
    let file = File::create(&path)?;
    serde_json::to_writer_pretty(file, model)
        .map_err(|e| ForecastError::Io(std::io::Error::other(e)))?;
    Ok(path)
}
