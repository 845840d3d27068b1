//! Compact DTW distance computation over a ring buffer.

use rayon::prelude::*;
use tracing::instrument;

use crate::cost::CostMatrix;
use crate::distance::DtwDistance;
use crate::error::DtwError;
use crate::matrix::DistanceMatrix;
use crate::series::{Series, SeriesView};

/// Compute the DTW distance between two series in O(min(nx, ny)) auxiliary
/// memory.
///
/// Equivalent to building the full cost matrix and taking
/// [`CostMatrix::distance`](crate::CostMatrix::distance), but the scratch
/// space is a ring buffer spanning only the shorter series plus two
/// sentinels, never the full matrix. Accumulation stays in squared space
/// with a single square root at the end.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`DtwError::EmptySeries`] | Exactly one input is empty |
///
/// Two empty series have distance zero.
#[instrument(skip(x, y), fields(nx = x.len(), ny = y.len()))]
pub fn dtw_distance(x: SeriesView<'_>, y: SeriesView<'_>) -> Result<DtwDistance, DtwError> {
    match (x.is_empty(), y.is_empty()) {
        (true, true) => return Ok(DtwDistance::new(0.0)),
        (true, false) | (false, true) => return Err(DtwError::EmptySeries),
        (false, false) => {}
    }
    // Scan the longer series row-wise so the ring spans the shorter one.
    let (rows, cols) = if x.len() >= y.len() {
        (x.as_slice(), y.as_slice())
    } else {
        (y.as_slice(), x.as_slice())
    };
    Ok(DtwDistance::from_squared(ring_cost(rows, cols)))
}

/// Ring-buffer DTW recurrence, `rows.len() >= cols.len() >= 1`. Returns the
/// accumulated squared cost of the final cell.
///
/// Cell `(i, j)` of the implicit `(nx+1) x (ny+1)` accumulated matrix lives
/// at slot `(j - i) mod ncol`, where `ncol = ny + 2`. Under that mapping a
/// write overwrites the cell's own diagonal predecessor, `prev(k)` holds the
/// left neighbor `(i, j-1)`, and `next(k)` holds the one above `(i-1, j)`.
/// The slot topology is fixed; only the physical start slot of each row
/// moves, by direct modular arithmetic on the row index.
fn ring_cost(rows: &[f64], cols: &[f64]) -> f64 {
    let nx = rows.len();
    let ny = cols.len();
    let ncol = ny + 2;

    // All slots infinite except the seed cell (0, 0) at slot 0. The infinite
    // slots double as the boundary row and column of the implicit matrix.
    let mut buf = vec![f64::INFINITY; ncol];
    buf[0] = 0.0;

    for i in 1..=nx {
        // Start slot for cell (i, 1): (1 - i) mod ncol.
        let mut k = (ncol + 1 - i % ncol) % ncol;
        for j in 1..=ny {
            let cost = (rows[i - 1] - cols[j - 1]).powi(2);
            let left = buf[prev(k, ncol)];
            let above = buf[next(k, ncol)];
            let diag = buf[k];
            buf[k] = cost + left.min(above).min(diag);
            k = next(k, ncol);
        }
        // k is now one past the last-written slot. That slot becomes the
        // column-0 boundary of the next row, so clear whatever value was
        // left there two rows ago.
        buf[k] = f64::INFINITY;
    }

    // Final cell (nx, ny) at slot (ny - nx) mod ncol.
    buf[(ny + ncol - nx % ncol) % ncol]
}

#[inline]
fn next(k: usize, ncol: usize) -> usize {
    (k + 1) % ncol
}

#[inline]
fn prev(k: usize, ncol: usize) -> usize {
    (k + ncol - 1) % ncol
}

/// Compute pairwise DTW distances for a collection of series.
///
/// Returns a symmetric [`DistanceMatrix`] containing distances for all
/// unique pairs. Computation is parallelized across pairs using rayon; each
/// pair is an independent [`dtw_distance`] call with its own scratch buffer.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`DtwError::EmptySeries`] | Some pair mixes an empty and a non-empty series |
#[instrument(skip(series), fields(n = series.len()))]
pub fn pairwise(series: &[Series]) -> Result<DistanceMatrix, DtwError> {
    let n = series.len();
    if n < 2 {
        return Ok(DistanceMatrix::from_raw(n, Vec::new()));
    }
    let total_pairs = n * (n - 1) / 2;

    let views: Vec<SeriesView<'_>> = series.iter().map(|s| s.as_view()).collect();

    // Flat indices enumerate the strict lower triangle: pair (i, j) with
    // i > j sits at i*(i-1)/2 + j, so the row is recovered by inverting the
    // triangular number below the index.
    let distances: Result<Vec<DtwDistance>, DtwError> = (0..total_pairs)
        .into_par_iter()
        .map(|flat_idx| {
            let i = ((1.0 + (1.0 + 8.0 * flat_idx as f64).sqrt()) / 2.0).floor() as usize;
            let j = flat_idx - i * (i - 1) / 2;
            dtw_distance(views[i], views[j])
        })
        .collect();

    Ok(DistanceMatrix::from_raw(n, distances?))
}

/// Compute the DTW-warped mean of a collection of series.
///
/// Selects the medoid (the series with the smallest mean pairwise DTW
/// distance to the others, earliest index on ties), aligns every series to
/// it along the optimal warping path, and accumulates the aligned samples
/// position by position on the medoid's time axis. Each accumulator slot is
/// divided by the number of series, so a medoid position visited by several
/// path steps of one series receives all of those contributions. The result
/// has the medoid's length.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`DtwError::EmptySeries`] | The collection is empty or contains an empty series |
#[instrument(skip(series), fields(n = series.len()))]
pub fn warped_mean(series: &[Series]) -> Result<Series, DtwError> {
    if series.is_empty() || series.iter().any(Series::is_empty) {
        return Err(DtwError::EmptySeries);
    }

    let matrix = pairwise(series)?;
    let medoid = series[medoid_index(&matrix)].as_view();

    let mut accum = vec![0.0; medoid.len()];
    for s in series {
        let mat = CostMatrix::build(s.as_view(), medoid)?;
        for step in &mat.warping_path() {
            accum[step.y] += s.as_ref()[step.x];
        }
    }
    let n = series.len() as f64;
    for v in &mut accum {
        *v /= n;
    }

    Series::new(accum)
}

/// Index of the series with the smallest summed distance to all others.
/// The earliest index wins ties.
fn medoid_index(matrix: &DistanceMatrix) -> usize {
    let n = matrix.len();
    let mut best = 0;
    let mut best_sum = f64::INFINITY;
    for i in 0..n {
        let sum: f64 = (0..n).map(|j| matrix.get(i, j).value()).sum();
        if sum < best_sum {
            best_sum = sum;
            best = i;
        }
    }
    best
}
