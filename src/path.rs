//! Warping path types for DTW alignment.

/// A single step in a DTW warping path, pairing index `x` in the first
/// series with index `y` in the second series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WarpingStep {
    /// Index into the first series.
    pub x: usize,
    /// Index into the second series.
    pub y: usize,
}

/// An ordered sequence of warping steps.
///
/// As produced by [`CostMatrix::warping_path`](crate::CostMatrix::warping_path)
/// the steps are in reverse temporal order, from `(nx-1, ny-1)` back to
/// `(0, 0)`. Call [`reversed`](WarpingPath::reversed) for the chronological
/// start-to-end alignment.
#[derive(Debug, Clone, PartialEq)]
pub struct WarpingPath(Vec<WarpingStep>);

impl WarpingPath {
    /// Create a new warping path from a vector of steps.
    pub(crate) fn new(steps: Vec<WarpingStep>) -> Self {
        Self(steps)
    }

    /// Return the warping steps as a slice, in the order they were recorded.
    #[must_use]
    pub fn steps(&self) -> &[WarpingStep] {
        &self.0
    }

    /// Return a copy of this path with the step order flipped.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let mut steps = self.0.clone();
        steps.reverse();
        Self(steps)
    }

    /// Return the number of steps in the path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return true if the path contains no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume and return the inner step vector.
    #[must_use]
    pub fn into_steps(self) -> Vec<WarpingStep> {
        self.0
    }
}

impl<'a> IntoIterator for &'a WarpingPath {
    type Item = &'a WarpingStep;
    type IntoIter = std::slice::Iter<'a, WarpingStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
