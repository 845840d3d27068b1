//! Series types with validation guarantees.

use std::ops::Index;

use crate::error::DtwError;

/// Owned series of samples. Guaranteed to contain only finite values.
///
/// A series may be empty. Emptiness rules are enforced per operation: the
/// distance between two empty series is zero, while mixing an empty series
/// with a non-empty one (or building a cost matrix from any empty series)
/// is rejected with [`DtwError::EmptySeries`].
#[derive(Debug, Clone, PartialEq)]
pub struct Series(Vec<f64>);

impl Series {
    /// Create a new series, validating that every sample is finite.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::NonFiniteValue`] | Any sample is NaN or infinite |
    pub fn new(samples: Vec<f64>) -> Result<Self, DtwError> {
        if let Some(index) = samples.iter().position(|v| !v.is_finite()) {
            return Err(DtwError::NonFiniteValue { index });
        }
        Ok(Self(samples))
    }

    /// Borrow this series as a zero-copy view.
    #[must_use]
    pub fn as_view(&self) -> SeriesView<'_> {
        SeriesView::new_unchecked(&self.0)
    }

    /// Return the number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return true if the series has no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume and return the inner vector.
    #[must_use]
    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

impl AsRef<[f64]> for Series {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}

impl TryFrom<Vec<f64>> for Series {
    type Error = DtwError;

    fn try_from(samples: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(samples)
    }
}

/// Borrowed, validated view into a series. Zero-copy reference.
#[derive(Debug, Clone, Copy)]
pub struct SeriesView<'a>(&'a [f64]);

impl<'a> SeriesView<'a> {
    /// Create a new view, validating that every sample is finite.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::NonFiniteValue`] | Any sample is NaN or infinite |
    pub fn new(slice: &'a [f64]) -> Result<Self, DtwError> {
        if let Some(index) = slice.iter().position(|v| !v.is_finite()) {
            return Err(DtwError::NonFiniteValue { index });
        }
        Ok(Self(slice))
    }

    /// Create a view without validation. For internal use where data is already validated.
    pub(crate) fn new_unchecked(slice: &'a [f64]) -> Self {
        Self(slice)
    }

    /// Return the underlying slice.
    #[must_use]
    pub fn as_slice(&self) -> &'a [f64] {
        self.0
    }

    /// Return the number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return true if the view has no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Index<usize> for SeriesView<'_> {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl AsRef<[f64]> for SeriesView<'_> {
    fn as_ref(&self) -> &[f64] {
        self.0
    }
}
