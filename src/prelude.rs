//! One-stop import for the common types and the metrics trait.

pub use crate::dataset::{Dataset, MiniBatcher};
pub use crate::error::{Error, Result};
pub use crate::metrics::Regression;
