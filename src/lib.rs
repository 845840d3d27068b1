//! Dynamic Time Warping for one-dimensional series.
//!
//! Pure math library, zero I/O. Provides the full accumulated-cost matrix
//! with warping-path extraction, a linear-memory DTW distance, pairwise
//! distance matrices, and a medoid-anchored warped mean. All costs are
//! squared-Euclidean; accumulation happens in squared space and a single
//! square root is taken at the end.

mod cost;
mod distance;
mod dtw;
mod error;
mod matrix;
mod path;
mod series;

pub use cost::CostMatrix;
pub use distance::DtwDistance;
pub use dtw::{dtw_distance, pairwise, warped_mean};
pub use error::DtwError;
pub use matrix::DistanceMatrix;
pub use path::{WarpingPath, WarpingStep};
pub use series::{Series, SeriesView};
