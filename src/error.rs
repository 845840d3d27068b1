//! Error types for DTW computation and input validation.

/// Errors from DTW computation and series validation.
#[derive(Debug, thiserror::Error)]
pub enum DtwError {
    /// Returned when an operation needs a non-empty series but received an
    /// empty one: cost-matrix construction with any empty input, or a
    /// distance between one empty and one non-empty series.
    #[error("series must be non-empty")]
    EmptySeries,

    /// Returned when a series contains NaN, infinity, or negative infinity.
    #[error("series contains non-finite value at index {index}")]
    NonFiniteValue {
        /// Position of the first non-finite value found.
        index: usize,
    },
}
