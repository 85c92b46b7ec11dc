//! Multi-scale box counting of a boundary volume
//!
//! For each box edge `s` the volume is tiled from the origin with disjoint
//! cubes of `s` voxels. Only whole boxes are used: the trailing strip of
//! `n mod s` voxels along each axis is ignored. A box is occupied when it
//! holds at least one boundary voxel.

use crate::volume::idx3d;

/// One usable scale and its occupied box count
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScaleSample {
    /// Box edge length in voxels (>= 1)
    pub scale: usize,
    /// Number of occupied boxes (>= 1)
    pub count: usize,
}

/// Round a requested scale to a box edge length
///
/// Rounds half to even (22.5 -> 22, 2.5 -> 2). Returns `None` for values
/// rounding below 1 and for non-finite values.
pub fn round_scale(scale: f64) -> Option<usize> {
    let rounded = scale.round_ties_even();
    if rounded.is_finite() && rounded >= 1.0 {
        Some(rounded as usize)
    } else {
        None
    }
}

/// Count occupied boxes of a boundary volume at each requested scale
///
/// Scales are processed in input order and rounded independently; two
/// inputs rounding to the same edge length both yield a sample. A scale is
/// dropped when it exceeds any axis or when no box is occupied.
///
/// # Arguments
/// * `boundary` - Binary boundary volume (nx * ny * nz), nonzero = surface
/// * `nx`, `ny`, `nz` - Volume dimensions
/// * `scales` - Requested box sizes in voxels
///
/// # Returns
/// The kept samples, in the order of `scales`
pub fn box_count_surface(
    boundary: &[u8],
    nx: usize, ny: usize, nz: usize,
    scales: &[f64],
) -> Vec<ScaleSample> {
    let surface = surface_coordinates(boundary, nx, ny, nz);
    let mut samples = Vec::with_capacity(scales.len());

    for &requested in scales {
        let Some(s) = round_scale(requested) else {
            continue;
        };
        if s > nx || s > ny || s > nz {
            continue;
        }

        let (bx, by, bz) = (nx / s, ny / s, nz / s);
        if bx == 0 || by == 0 || bz == 0 {
            continue;
        }

        let count = count_occupied_boxes(&surface, s, (bx, by, bz));
        if count > 0 {
            samples.push(ScaleSample { scale: s, count });
        }
    }

    samples
}

/// Coordinates of all nonzero voxels
fn surface_coordinates(
    boundary: &[u8],
    nx: usize, ny: usize, nz: usize,
) -> Vec<(usize, usize, usize)> {
    let mut coords = Vec::new();
    for k in 0..nz {
        for j in 0..ny {
            for i in 0..nx {
                if boundary[idx3d(i, j, k, nx, ny)] != 0 {
                    coords.push((i, j, k));
                }
            }
        }
    }
    coords
}

/// Number of distinct boxes of edge `s` hit by the surface voxels
fn count_occupied_boxes(
    surface: &[(usize, usize, usize)],
    s: usize,
    boxes: (usize, usize, usize),
) -> usize {
    let (bx, by, bz) = boxes;
    let mut occupied = vec![false; bx * by * bz];
    let mut count = 0usize;

    for &(i, j, k) in surface {
        let (ib, jb, kb) = (i / s, j / s, k / s);
        // Voxel lies in the discarded partial strip
        if ib >= bx || jb >= by || kb >= bz {
            continue;
        }

        let cell = &mut occupied[idx3d(ib, jb, kb, bx, by)];
        if !*cell {
            *cell = true;
            count += 1;
        }
    }

    count
}
