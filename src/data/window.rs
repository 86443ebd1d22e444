//! Fixed-width lookback windows.
//!
//! For a series `x` of length `n` and look-back `k`:
//!
//! ```text
//! window[i] = x[i .. i + k]
//! label[i]  = x[i + k]
//! ```
//!
//! giving `n - k` aligned (window, label) pairs.

use crate::error::{ForecastError, Result};

/// Windows and labels, aligned index-for-index.
#[derive(Debug, Clone, PartialEq)]
pub struct Windows {
    pub windows: Vec<Vec<f64>>,
    pub labels: Vec<f64>,
}

impl Windows {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Slice `values` into look-back windows and their next-value labels.
pub fn build_windows(values: &[f64], look_back: usize) -> Result<Windows> {
    if look_back == 0 {
        return Err(ForecastError::InvalidRequest("look-back must be at least 1".to_string()));
    }
    if values.len() <= look_back {
        return Err(ForecastError::InsufficientHistory {
            needed: look_back + 1,
            available: values.len(),
        });
    }

    let windows = values.windows(look_back + 1).map(|w| w[..look_back].to_vec()).collect();
    let labels = values[look_back..].to_vec();

    Ok(Windows { windows, labels })
}
