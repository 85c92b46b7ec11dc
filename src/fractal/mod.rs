//! Box-counting fractal dimension of region surfaces
//!
//! - `boundary`: one-voxel surface shell of a binary mask (6-connected erosion)
//! - `box_count`: occupied box counts over a set of box sizes
//! - `fit`: log-log least-squares fit giving FD and R²

pub mod boundary;
pub mod box_count;
pub mod fit;

pub use boundary::{erode_mask, extract_boundary};
pub use box_count::{box_count_surface, round_scale, ScaleSample};
pub use fit::{fit_fractal_dimension, linear_fit, FitResult, LineFit, COUNT_EPSILON, R2_EPSILON};
