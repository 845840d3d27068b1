//! Pairwise DTW distance matrix.

use crate::distance::DtwDistance;

/// Distance matrix over a collection of series.
///
/// DTW distance is symmetric, so only the strict lower triangle is stored:
/// the distance for pair `(i, j)` with `i > j` sits at flat index
/// `i*(i-1)/2 + j`. Lookups transpose as needed and the diagonal is zero by
/// definition, never stored.
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    n: usize,
    data: Vec<DtwDistance>,
}

impl DistanceMatrix {
    /// Wrap a lower-triangular distance vector for `n` series.
    pub(crate) fn from_raw(n: usize, data: Vec<DtwDistance>) -> Self {
        debug_assert_eq!(data.len(), n * n.saturating_sub(1) / 2);
        Self { n, data }
    }

    /// Number of series the matrix covers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.n
    }

    /// True when the matrix covers no series.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Distance between series `i` and series `j`, in either argument order.
    ///
    /// # Panics
    ///
    /// Panics if `i >= len()` or `j >= len()`.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> DtwDistance {
        assert!(i < self.n && j < self.n, "pair ({i}, {j}) out of range for {} series", self.n);
        if i == j {
            return DtwDistance::new(0.0);
        }
        let (row, col) = if i > j { (i, j) } else { (j, i) };
        self.data[row * (row - 1) / 2 + col]
    }

    /// Iterate the stored triangle as `(i, j, distance)` tuples, `i > j`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, DtwDistance)> + '_ {
        (1..self.n).flat_map(move |i| (0..i).map(move |j| (i, j, self.data[i * (i - 1) / 2 + j])))
    }
}
