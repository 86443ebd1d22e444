//! Point-prediction models consumed by the rollout.
//!
//! Models are plain values behind the [`Predictor`] trait so the rollout code
//! stays generic over where predictions come from.

pub mod model;

pub use model::*;
