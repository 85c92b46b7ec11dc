//! Region boundary extraction
//!
//! The boundary of a binary mask is the one-voxel-thick outer shell left
//! after removing a single 6-connected erosion of the mask.

use crate::volume::idx3d;

/// Face neighbour offsets of the 6-connected structuring element
const FACE_OFFSETS: [(i64, i64, i64); 6] = [
    (-1, 0, 0),
    (1, 0, 0),
    (0, -1, 0),
    (0, 1, 0),
    (0, 0, -1),
    (0, 0, 1),
];

/// Erode a binary mask with the 6-connected (face) structuring element
///
/// A voxel survives only if it and all six face neighbours are inside the
/// mask. Voxels outside the volume count as background, so nothing on the
/// volume border survives.
///
/// # Arguments
/// * `mask` - Binary mask (nx * ny * nz), nonzero = inside
/// * `nx`, `ny`, `nz` - Volume dimensions
///
/// # Returns
/// Eroded binary mask (0/1) of the same length
pub fn erode_mask(mask: &[u8], nx: usize, ny: usize, nz: usize) -> Vec<u8> {
    let mut eroded = vec![0u8; mask.len()];

    for k in 0..nz {
        for j in 0..ny {
            for i in 0..nx {
                if mask[idx3d(i, j, k, nx, ny)] == 0 {
                    continue;
                }

                let all_inside = FACE_OFFSETS.iter().all(|&(dx, dy, dz)| {
                    let ni = i as i64 + dx;
                    let nj = j as i64 + dy;
                    let nk = k as i64 + dz;

                    if ni < 0 || ni >= nx as i64 ||
                       nj < 0 || nj >= ny as i64 ||
                       nk < 0 || nk >= nz as i64 {
                        return false;
                    }

                    mask[idx3d(ni as usize, nj as usize, nk as usize, nx, ny)] != 0
                });

                if all_inside {
                    eroded[idx3d(i, j, k, nx, ny)] = 1;
                }
            }
        }
    }

    eroded
}

/// Extract the surface voxels of a binary region mask
///
/// boundary = mask AND NOT erode(mask). The result is always a subset of
/// the mask, and an empty mask yields an empty boundary.
///
/// # Arguments
/// * `mask` - Binary mask (nx * ny * nz), nonzero = inside
/// * `nx`, `ny`, `nz` - Volume dimensions
///
/// # Returns
/// Binary boundary (0/1) of the same length
pub fn extract_boundary(mask: &[u8], nx: usize, ny: usize, nz: usize) -> Vec<u8> {
    let eroded = erode_mask(mask, nx, ny, nz);

    mask.iter()
        .zip(eroded.iter())
        .map(|(&m, &e)| if m != 0 && e == 0 { 1 } else { 0 })
        .collect()
}
