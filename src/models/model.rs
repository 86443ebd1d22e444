//! One-step predictors.
//!
//! The rollout only ever needs one primitive: given the last `look_back`
//! normalized values, predict the next one. Anything that can do that is a
//! [`Predictor`]; trained weights are read-only, so a predictor can be shared
//! across concurrent requests.

use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, Result};

/// A trained point-prediction model.
pub trait Predictor {
    /// Predict the value that follows `window` (normalized units).
    fn predict(&self, window: &[f64]) -> Result<f64>;

    /// Window width the model was trained on, if it declares one.
    fn input_len(&self) -> Option<usize> {
        None
    }
}

impl<F> Predictor for F
where
    F: Fn(&[f64]) -> Result<f64>,
{
    fn predict(&self, window: &[f64]) -> Result<f64> {
        self(window)
    }
}

/// Linear autoregressive model: `y = bias + Σ weights[i] * window[i]`.
///
/// Weights are ordered oldest-first, matching the window layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub weights: Vec<f64>,
    #[serde(default)]
    pub bias: f64,
}

impl LinearModel {
    pub fn new(weights: Vec<f64>, bias: f64) -> Result<Self> {
        let model = Self { weights, bias };
        model.validate()?;
        Ok(model)
    }

    /// Reject models that could never produce a usable prediction.
    pub fn validate(&self) -> Result<()> {
        if self.weights.is_empty() {
            return Err(ForecastError::ModelInference("model has no weights".to_string()));
        }
        if !self.bias.is_finite() || self.weights.iter().any(|w| !w.is_finite()) {
            return Err(ForecastError::ModelInference("model has non-finite parameters".to_string()));
        }
        Ok(())
    }
}

impl Predictor for LinearModel {
    fn predict(&self, window: &[f64]) -> Result<f64> {
        if window.len() != self.weights.len() {
            return Err(ForecastError::ModelInference(format!(
                "model expects a window of {} values, got {}",
                self.weights.len(),
                window.len()
            )));
        }

        let y = self.bias + self.weights.iter().zip(window).map(|(w, x)| w * x).sum::<f64>();
        if !y.is_finite() {
            return Err(ForecastError::ModelInference("non-finite prediction".to_string()));
        }
        Ok(y)
    }

    fn input_len(&self) -> Option<usize> {
        Some(self.weights.len())
    }
}
