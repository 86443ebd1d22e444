//! Polynomial regression on one variable.
//!
//! Raw day ordinals are around 7.4e5, so `x^4` would be ~3e23 and the
//! Vandermonde matrix hopeless. We fit on `u = (x - center) / scale` instead;
//! the space of degree-`d` polynomials is closed under affine maps of `x`, so
//! the fitted curve is the same, only the coefficients differ.

use nalgebra::{DMatrix, DVector};

use crate::error::{ForecastError, Result};
use crate::math::solve_least_squares;

/// A fitted polynomial `y(x) = Σ β_j u^j` with `u = (x - center) / scale`.
#[derive(Debug, Clone, PartialEq)]
pub struct PolyFit {
    coefficients: Vec<f64>,
    center: f64,
    scale: f64,
}

impl PolyFit {
    /// Least-squares fit of degree `degree` through `(xs[i], ys[i])`.
    ///
    /// Needs at least `degree + 1` points.
    pub fn fit(xs: &[f64], ys: &[f64], degree: usize) -> Result<Self> {
        if xs.len() != ys.len() {
            return Err(ForecastError::InvalidSeries(format!(
                "{} x values for {} y values",
                xs.len(),
                ys.len()
            )));
        }
        let n = xs.len();
        let p = degree + 1;
        if n < p {
            return Err(ForecastError::InsufficientHistory { needed: p, available: n });
        }

        let lo = xs.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let center = 0.5 * (lo + hi);
        let half_span = 0.5 * (hi - lo);
        let scale = if half_span > 0.0 { half_span } else { 1.0 };

        let mut x = DMatrix::<f64>::zeros(n, p);
        for (i, &xi) in xs.iter().enumerate() {
            let u = (xi - center) / scale;
            let mut term = 1.0;
            for j in 0..p {
                x[(i, j)] = term;
                term *= u;
            }
        }
        let y = DVector::from_column_slice(ys);

        let beta = solve_least_squares(&x, &y)?;

        Ok(Self {
            coefficients: beta.iter().copied().collect(),
            center,
            scale,
        })
    }

    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    /// Evaluate the fitted curve at `x` (Horner).
    pub fn evaluate(&self, x: f64) -> f64 {
        let u = (x - self.center) / self.scale;
        self.coefficients.iter().rev().fold(0.0, |acc, &c| acc * u + c)
    }
}
