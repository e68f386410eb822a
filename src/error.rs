use thiserror::Error;

/// Input data validation errors.
///
/// Raised before any fitting work begins, so a failed call leaves no
/// partially computed state behind.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InputError {
    /// The input holds no vectors or no dimensions.
    #[error("input data set is empty")]
    Empty,
    /// A row length differs from the first row length.
    #[error("jagged input: row {row} has {found} dimensions, expected {expected}")]
    Jagged {
        /// Index of the offending row.
        row: usize,
        /// Dimensionality of the first row.
        expected: usize,
        /// Dimensionality of the offending row.
        found: usize,
    },
}

/// Extraction call errors.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    /// Input validation failed.
    #[error(transparent)]
    Input(#[from] InputError),
    /// The progress callback requested cancellation.
    #[error("extraction cancelled by progress callback")]
    Cancelled,
}
