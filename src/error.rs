use std::fmt;

/// The result type used across the whole workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// Invalid-argument conditions reported by datasets, batchers and models.
///
/// Every variant is raised at the entry of the offending call, before any
/// model state has been touched. Numerical divergence (NaN/Inf from a too
/// large learning rate) is deliberately not represented here: it propagates
/// through predictions and loss histories for the caller to inspect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A model was asked for zero features.
    ZeroFeatures,
    /// A dataset or batcher was built over zero rows.
    EmptyDataset,
    /// A batcher was asked for batches of zero rows.
    InvalidBatchSize,
    /// The feature matrix and target vector disagree on the number of rows.
    MismatchedRows { records: usize, targets: usize },
    /// The feature matrix width disagrees with the model's parameter vector.
    MismatchedFeatures { expected: usize, actual: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ZeroFeatures => write!(f, "a model needs at least one feature"),
            Error::EmptyDataset => write!(f, "the dataset contains no rows"),
            Error::InvalidBatchSize => write!(f, "batch size must be at least one row"),
            Error::MismatchedRows { records, targets } => write!(
                f,
                "records have {} rows but there are {} targets",
                records, targets
            ),
            Error::MismatchedFeatures { expected, actual } => write!(
                f,
                "expected {} features per row, got {}",
                expected, actual
            ),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_both_row_counts() {
        let err = Error::MismatchedRows {
            records: 4,
            targets: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains('4') && msg.contains('3'));
    }
}
