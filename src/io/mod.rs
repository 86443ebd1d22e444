//! Input/output helpers.
//!
//! - CSV series source (`ingest`)
//! - per-region model files (`model_file`)

pub mod ingest;
pub mod model_file;

pub use ingest::*;
pub use model_file::*;
