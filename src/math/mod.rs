//! Mathematical utilities: least squares and polynomial regression.

pub mod ols;
pub mod poly;

pub use ols::*;
pub use poly::*;
