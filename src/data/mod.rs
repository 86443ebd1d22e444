//! Series preparation: scaling, windowing, and the date-indexed sample store.

pub mod scale;
pub mod source;
pub mod store;
pub mod window;

pub use scale::MinMaxScaler;
pub use source::{InMemorySource, SeriesSource};
pub use store::{Lookup, SampleRow, SampleStore};
pub use window::{Windows, build_windows};
