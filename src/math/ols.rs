//! Ordinary least squares via SVD.
//!
//! The trend fit is a small linear regression
//!
//! ```text
//! minimize Σ (y_i - x_i^T β)^2
//! ```
//!
//! with a handful of columns (polynomial degree + 1). SVD handles tall design
//! matrices, which `QR::solve` does not.

use nalgebra::{DMatrix, DVector};

use crate::error::{ForecastError, Result};

/// Singular values below `RANK_TOLERANCE * σ_max` count as zero.
const RANK_TOLERANCE: f64 = 1e-12;

/// Solve `x β ≈ y`. Fails when the columns are linearly dependent.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Result<DVector<f64>> {
    if x.nrows() != y.len() {
        return Err(ForecastError::InvalidSeries(format!(
            "design matrix has {} rows but {} targets",
            x.nrows(),
            y.len()
        )));
    }

    let svd = x.clone().svd(true, true);
    let sigma_max = svd.singular_values.max();
    let eps = RANK_TOLERANCE * sigma_max.max(1.0);

    let rank = svd.rank(eps);
    if rank < x.ncols() {
        return Err(ForecastError::InvalidSeries(format!(
            "regression is rank deficient ({rank} of {} columns)",
            x.ncols()
        )));
    }

    let beta = svd
        .solve(y, eps)
        .map_err(|e| ForecastError::InvalidSeries(format!("least squares solve failed: {e}")))?;
    if beta.iter().any(|v| !v.is_finite()) {
        return Err(ForecastError::InvalidSeries("least squares produced non-finite coefficients".to_string()));
    }
    Ok(beta)
}
