//! Labeled 3D atlas volume
//!
//! Labels are stored flat in Fortran (column-major) order to match the NIfTI
//! convention: index = x + y*nx + z*nx*ny.

use crate::error::{FdError, FdResult};

/// Index into 3D array (Fortran/column-major order)
#[inline(always)]
pub fn idx3d(i: usize, j: usize, k: usize, nx: usize, ny: usize) -> usize {
    i + j * nx + k * nx * ny
}

/// Integer-labeled atlas volume. Label 0 is background.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelVolume {
    labels: Vec<i64>,
    dims: (usize, usize, usize),
}

impl LabelVolume {
    /// Wrap flat labels with dimensions `(nx, ny, nz)`.
    ///
    /// Fails if the label count does not match the dimensions.
    pub fn new(labels: Vec<i64>, dims: (usize, usize, usize)) -> FdResult<Self> {
        let (nx, ny, nz) = dims;
        let expected = nx
            .checked_mul(ny)
            .and_then(|v| v.checked_mul(nz))
            .ok_or_else(|| FdError::invalid_volume(format!("dimensions {nx}x{ny}x{nz} overflow")))?;
        if labels.len() != expected {
            return Err(FdError::invalid_volume(format!(
                "{} labels do not fill a {}x{}x{} volume ({} voxels)",
                labels.len(), nx, ny, nz, expected
            )));
        }
        Ok(Self { labels, dims })
    }

    /// Convert scaled voxel values to labels, truncating toward zero.
    ///
    /// Non-finite values become background.
    pub fn from_values(values: &[f64], dims: (usize, usize, usize)) -> FdResult<Self> {
        let labels = values
            .iter()
            .map(|&v| if v.is_finite() { v.trunc() as i64 } else { 0 })
            .collect();
        Self::new(labels, dims)
    }

    /// Volume dimensions `(nx, ny, nz)`.
    pub fn dims(&self) -> (usize, usize, usize) {
        self.dims
    }

    /// Flat labels in column-major order.
    pub fn labels(&self) -> &[i64] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Label at voxel `(i, j, k)`.
    pub fn get(&self, i: usize, j: usize, k: usize) -> i64 {
        let (nx, ny, _) = self.dims;
        self.labels[idx3d(i, j, k, nx, ny)]
    }

    /// Binary mask (0/1) of the voxels carrying `roi_id`, with its voxel count.
    pub fn region_mask(&self, roi_id: i64) -> (Vec<u8>, usize) {
        let mut count = 0usize;
        let mask: Vec<u8> = self
            .labels
            .iter()
            .map(|&l| {
                if l == roi_id {
                    count += 1;
                    1
                } else {
                    0
                }
            })
            .collect();
        (mask, count)
    }
}
