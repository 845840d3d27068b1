//! Full accumulated-cost matrix and warping-path backtracking.

use tracing::instrument;

use crate::distance::DtwDistance;
use crate::error::DtwError;
use crate::path::{WarpingPath, WarpingStep};
use crate::series::SeriesView;

/// Complete `(nx+1) x (ny+1)` accumulated-cost matrix in squared-distance space.
///
/// Row 0 and column 0 are boundary cells: `(0, 0)` is zero and every other
/// boundary cell is infinite, which forces every warping path to enter the
/// interior at matrix cell `(1, 1)`. Each interior cell `(i, j)` holds the
/// squared local cost of pairing `x[i-1]` with `y[j-1]` plus the minimum of
/// its three predecessors (above, left, diagonal).
///
/// Interior accessors like [`cost`](CostMatrix::cost) and the backtracking in
/// [`warping_path`](CostMatrix::warping_path) use 0-indexed series
/// coordinates, i.e. `(i, j)` refers to the cell for `x[i]` and `y[j]`;
/// [`cell`](CostMatrix::cell) exposes the raw boundary-inclusive layout.
#[derive(Debug, Clone, PartialEq)]
pub struct CostMatrix {
    nx: usize,
    ny: usize,
    /// Flat row-major storage, `(nx + 1) * (ny + 1)` cells.
    data: Vec<f64>,
}

impl CostMatrix {
    /// Build the full accumulated-cost matrix for two series.
    ///
    /// Runs in O(nx * ny) time and space. Use
    /// [`dtw_distance`](crate::dtw_distance) when only the scalar distance is
    /// needed and memory must stay linear.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::EmptySeries`] | Either input is empty |
    #[instrument(skip(x, y), fields(nx = x.len(), ny = y.len()))]
    pub fn build(x: SeriesView<'_>, y: SeriesView<'_>) -> Result<Self, DtwError> {
        if x.is_empty() || y.is_empty() {
            return Err(DtwError::EmptySeries);
        }
        let xs = x.as_slice();
        let ys = y.as_slice();
        let nx = xs.len();
        let ny = ys.len();
        let width = ny + 1;

        // Boundary row and column start infinite; only the origin is zero.
        let mut data = vec![f64::INFINITY; (nx + 1) * width];
        data[0] = 0.0;

        // Row-major interior scan: the above, left, and diagonal predecessors
        // of (i, j) are all resolved before (i, j) itself.
        for i in 1..=nx {
            for j in 1..=ny {
                let cost = (xs[i - 1] - ys[j - 1]).powi(2);
                let idx = i * width + j;
                let above = data[idx - width];
                let left = data[idx - 1];
                let diag = data[idx - width - 1];
                data[idx] = cost + above.min(left).min(diag);
            }
        }

        Ok(Self { nx, ny, data })
    }

    /// Return the length of the first series.
    #[must_use]
    pub fn nx(&self) -> usize {
        self.nx
    }

    /// Return the length of the second series.
    #[must_use]
    pub fn ny(&self) -> usize {
        self.ny
    }

    /// Accumulated squared cost at interior cell `(i, j)`, 0-indexed over the
    /// original series (the boundary row/column is skipped).
    ///
    /// # Panics
    ///
    /// Panics if `i >= nx` or `j >= ny`.
    #[must_use]
    pub fn cost(&self, i: usize, j: usize) -> f64 {
        assert!(i < self.nx, "row index {i} out of bounds for {} rows", self.nx);
        assert!(j < self.ny, "column index {j} out of bounds for {} columns", self.ny);
        self.data[(i + 1) * (self.ny + 1) + j + 1]
    }

    /// Raw cell access in boundary-inclusive coordinates, `(0, 0)` through
    /// `(nx, ny)`.
    ///
    /// # Panics
    ///
    /// Panics if `i > nx` or `j > ny`.
    #[must_use]
    pub fn cell(&self, i: usize, j: usize) -> f64 {
        assert!(i <= self.nx, "row index {i} out of bounds for {} rows", self.nx + 1);
        assert!(j <= self.ny, "column index {j} out of bounds for {} columns", self.ny + 1);
        self.data[i * (self.ny + 1) + j]
    }

    /// The DTW distance: square root of the final accumulated cell.
    #[must_use]
    pub fn distance(&self) -> DtwDistance {
        DtwDistance::from_squared(self.cost(self.nx - 1, self.ny - 1))
    }

    /// Backtrack the optimal warping path through this matrix.
    ///
    /// Starts at interior cell `(nx-1, ny-1)` and repeatedly steps toward the
    /// strictly smallest of the three predecessors, with a deterministic
    /// tie-break: diagonal over above, above over left. On the first row only
    /// left steps remain, on the first column only up steps. The returned
    /// path is in reverse temporal order and ends with `(0, 0)`; its length
    /// is at least `max(nx, ny)` and at most `nx + ny - 1`.
    #[must_use]
    pub fn warping_path(&self) -> WarpingPath {
        let mut steps = Vec::with_capacity(self.nx + self.ny - 1);
        let mut i = self.nx - 1;
        let mut j = self.ny - 1;

        loop {
            steps.push(WarpingStep { x: i, y: j });
            if i == 0 && j == 0 {
                break;
            }
            if i == 0 {
                j -= 1;
            } else if j == 0 {
                i -= 1;
            } else {
                let diag = self.cost(i - 1, j - 1);
                let above = self.cost(i - 1, j);
                let left = self.cost(i, j - 1);
                if diag <= above && diag <= left {
                    i -= 1;
                    j -= 1;
                } else if above <= left {
                    i -= 1;
                } else {
                    j -= 1;
                }
            }
        }

        WarpingPath::new(steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(data: &[f64]) -> SeriesView<'_> {
        SeriesView::new(data).unwrap()
    }

    #[test]
    fn rejects_empty_input() {
        let result = CostMatrix::build(view(&[]), view(&[1.0]));
        assert!(matches!(result, Err(DtwError::EmptySeries)));
        let result = CostMatrix::build(view(&[1.0]), view(&[]));
        assert!(matches!(result, Err(DtwError::EmptySeries)));
    }

    #[test]
    fn boundary_cells() {
        // x = [0, 0], y = [0, 0, 0]: origin is zero, the rest of the boundary
        // row/column is infinite, and every interior cell accumulates to zero.
        let mat = CostMatrix::build(view(&[0.0, 0.0]), view(&[0.0, 0.0, 0.0])).unwrap();
        assert_eq!(mat.cell(0, 0), 0.0);
        for i in 1..=mat.nx() {
            assert_eq!(mat.cell(i, 0), f64::INFINITY);
        }
        for j in 1..=mat.ny() {
            assert_eq!(mat.cell(0, j), f64::INFINITY);
        }
        for i in 0..mat.nx() {
            for j in 0..mat.ny() {
                assert_eq!(mat.cost(i, j), 0.0);
            }
        }
        assert!((mat.distance().value() - 0.0).abs() < 1e-12);
    }

    #[test]
    fn hand_computed_2x2() {
        // a=[0,1], b=[1,0]
        // C[0][0] = (0-1)² = 1
        // C[0][1] = (0-0)² + C[0][0] = 1
        // C[1][0] = (1-1)² + C[0][0] = 1
        // C[1][1] = (1-0)² + min(C[0][0], C[0][1], C[1][0]) = 2
        let mat = CostMatrix::build(view(&[0.0, 1.0]), view(&[1.0, 0.0])).unwrap();
        assert!((mat.cost(0, 0) - 1.0).abs() < 1e-12);
        assert!((mat.cost(0, 1) - 1.0).abs() < 1e-12);
        assert!((mat.cost(1, 0) - 1.0).abs() < 1e-12);
        assert!((mat.cost(1, 1) - 2.0).abs() < 1e-12);
        assert!((mat.distance().value() - 2.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn single_cell_matrix() {
        let mat = CostMatrix::build(view(&[1.0]), view(&[5.0])).unwrap();
        assert!((mat.cost(0, 0) - 16.0).abs() < 1e-12);
        assert!((mat.distance().value() - 4.0).abs() < 1e-12);
        let path = mat.warping_path();
        assert_eq!(path.steps(), &[WarpingStep { x: 0, y: 0 }]);
    }

    #[test]
    fn path_is_reverse_ordered() {
        let mat = CostMatrix::build(view(&[1.0, 2.0, 3.0]), view(&[1.0, 2.0, 3.0])).unwrap();
        let path = mat.warping_path();
        assert_eq!(path.steps().first(), Some(&WarpingStep { x: 2, y: 2 }));
        assert_eq!(path.steps().last(), Some(&WarpingStep { x: 0, y: 0 }));
    }

    #[test]
    fn identical_series_follow_diagonal() {
        let mat = CostMatrix::build(view(&[1.0, 2.0, 3.0]), view(&[1.0, 2.0, 3.0])).unwrap();
        let forward = mat.warping_path().reversed();
        let steps: Vec<(usize, usize)> = forward.steps().iter().map(|s| (s.x, s.y)).collect();
        assert_eq!(steps, vec![(0, 0), (1, 1), (2, 2)]);
    }

    #[test]
    fn known_path_with_unequal_lengths() {
        // Reference alignment from hand-solving the 5x3 matrix for
        // x = [1..5], y = [2, 3, 4].
        let mat = CostMatrix::build(
            view(&[1.0, 2.0, 3.0, 4.0, 5.0]),
            view(&[2.0, 3.0, 4.0]),
        )
        .unwrap();
        let forward = mat.warping_path().reversed();
        let steps: Vec<(usize, usize)> = forward.steps().iter().map(|s| (s.x, s.y)).collect();
        assert_eq!(steps, vec![(0, 0), (1, 0), (2, 1), (3, 2), (4, 2)]);
    }

    #[test]
    fn path_steps_are_unit_moves() {
        let mat = CostMatrix::build(
            view(&[1.0, 5.0, 2.0, 8.0, 3.0]),
            view(&[2.0, 4.0, 7.0]),
        )
        .unwrap();
        let forward = mat.warping_path().reversed();
        for pair in forward.steps().windows(2) {
            let dx = pair[1].x - pair[0].x;
            let dy = pair[1].y - pair[0].y;
            assert!(dx <= 1, "step in x dimension too large: {dx}");
            assert!(dy <= 1, "step in y dimension too large: {dy}");
            assert!(dx + dy >= 1, "no progress in step");
        }
    }

    #[test]
    fn path_length_bounds() {
        let mat = CostMatrix::build(
            view(&[1.0, 5.0, 2.0, 8.0, 3.0, 0.0]),
            view(&[2.0, 4.0, 7.0]),
        )
        .unwrap();
        let len = mat.warping_path().len();
        assert!(len >= 6, "path shorter than max(nx, ny): {len}");
        assert!(len <= 6 + 3 - 1, "path longer than nx + ny - 1: {len}");
    }
}
