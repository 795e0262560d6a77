//! `minilearn` is a small toolkit for fitting regression models by
//! mini-batch gradient descent, implemented from first principles.
//!
//! The root crate carries the shared pieces: a row-aligned [`Dataset`]
//! container, the [`MiniBatcher`] that splits it into per-epoch batches,
//! regression metrics and the common error type. The models live in
//! workspace members (`minilearn-linear`).
//!

pub mod dataset;
pub mod error;
mod metrics_regression;
pub mod prelude;

pub use dataset::{Dataset, MiniBatcher};
pub use error::{Error, Result};

/// Common metrics functions for regression
pub mod metrics {
    pub use crate::metrics_regression::Regression;
}
