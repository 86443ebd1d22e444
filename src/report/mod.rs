//! Terminal and JSON rendering of forecast results.

pub mod format;

pub use format::*;
