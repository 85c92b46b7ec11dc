//! Per-region fractal dimension pipeline
//!
//! Each region is processed independently: mask -> boundary -> box counts
//! over the scale set -> log-log fit -> one `RegionResult`. Regions absent
//! from the volume produce no result.

use std::path::PathBuf;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::FdResult;
use crate::fractal::{box_count_surface, extract_boundary, fit_fractal_dimension};
use crate::labels::{filter_atlas_regions, read_labels_file, RegionLabel, DEFAULT_MAX_LABEL_ID};
use crate::nifti_io::read_atlas;
use crate::table::save_table;
use crate::volume::LabelVolume;

/// Box sizes in voxels; each is rounded to an integer edge length before use
pub const DEFAULT_SCALES: [f64; 5] = [22.5, 11.25, 5.625, 2.8125, 1.40625];

/// Parameters of a fractal dimension run
#[derive(Clone, Debug, PartialEq)]
pub struct FdParams {
    /// Requested box sizes in voxels, in processing order
    pub scales: Vec<f64>,
    /// Only label ids strictly below this value are processed
    pub max_label_id: i64,
}

impl Default for FdParams {
    fn default() -> Self {
        Self {
            scales: DEFAULT_SCALES.to_vec(),
            max_label_id: DEFAULT_MAX_LABEL_ID,
        }
    }
}

/// Inputs and outputs of one run
#[derive(Clone, Debug)]
pub struct RunConfig {
    pub atlas: PathBuf,
    pub labels_json: PathBuf,
    pub out: PathBuf,
    pub params: FdParams,
}

/// Fractal dimension of one region present in the volume
#[derive(Clone, Debug, PartialEq)]
pub struct RegionResult {
    pub roi_id: i64,
    pub roi_name: String,
    /// Number of voxels carrying the region label (> 0)
    pub voxel_count: usize,
    pub fd: Option<f64>,
    pub r2: Option<f64>,
    pub n_scales: usize,
}

/// Counts reported at the end of a run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunSummary {
    /// Regions requested after filtering
    pub regions: usize,
    /// Rows written (regions present in the volume)
    pub rows: usize,
    /// Rows whose fit is undefined
    pub undefined: usize,
}

/// Estimate the surface fractal dimension of one region
///
/// Returns `None` when no voxel carries `roi_id`.
pub fn process_region(
    volume: &LabelVolume,
    roi_id: i64,
    roi_name: &str,
    scales: &[f64],
) -> Option<RegionResult> {
    let (nx, ny, nz) = volume.dims();
    let (mask, voxel_count) = volume.region_mask(roi_id);
    if voxel_count == 0 {
        debug!(roi_id, roi_name, "region absent from volume, skipped");
        return None;
    }

    let boundary = extract_boundary(&mask, nx, ny, nz);
    let samples = box_count_surface(&boundary, nx, ny, nz, scales);
    let fit = fit_fractal_dimension(&samples);

    debug!(
        roi_id,
        roi_name,
        voxel_count,
        samples = ?samples,
        fd = ?fit.fd,
        r2 = ?fit.r2,
        "processed region"
    );

    Some(RegionResult {
        roi_id,
        roi_name: roi_name.to_string(),
        voxel_count,
        fd: fit.fd,
        r2: fit.r2,
        n_scales: fit.n_scales_used,
    })
}

/// Process every region, keeping the order of `regions`
///
/// Regions run in parallel; the volume is shared read-only.
pub fn process_regions(
    volume: &LabelVolume,
    regions: &[RegionLabel],
    scales: &[f64],
) -> Vec<RegionResult> {
    regions
        .par_iter()
        .filter_map(|r| process_region(volume, r.id, &r.name, scales))
        .collect()
}

/// Summarize a finished run
pub fn summarize(regions: usize, results: &[RegionResult]) -> RunSummary {
    RunSummary {
        regions,
        rows: results.len(),
        undefined: results.iter().filter(|r| r.fd.is_none()).count(),
    }
}

/// Load the inputs, process all regions and write the result table
///
/// Inputs are fully loaded and validated before any output is written.
pub fn run(config: &RunConfig) -> FdResult<RunSummary> {
    info!(path = %config.atlas.display(), "loading atlas");
    let atlas = read_atlas(&config.atlas)?;
    let (nx, ny, nz) = atlas.volume.dims();
    info!(nx, ny, nz, voxel_size = ?atlas.voxel_size, "volume shape");

    info!(path = %config.labels_json.display(), "loading labels");
    let labels = read_labels_file(&config.labels_json)?;
    let regions = filter_atlas_regions(labels, config.params.max_label_id);
    info!(count = regions.len(), "atlas regions to process");
    info!(scales = ?config.params.scales, "box sizes (voxels)");

    let results = process_regions(&atlas.volume, &regions, &config.params.scales);

    save_table(&config.out, &results)?;
    let summary = summarize(regions.len(), &results);
    info!(
        path = %config.out.display(),
        rows = summary.rows,
        undefined = summary.undefined,
        skipped = summary.regions - summary.rows,
        "fractal dimensions written"
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::volume::idx3d;

    fn volume_with_cube(n: usize, side: usize, label: i64) -> LabelVolume {
        let mut labels = vec![0i64; n * n * n];
        for k in 0..side {
            for j in 0..side {
                for i in 0..side {
                    labels[idx3d(i, j, k, n, n)] = label;
                }
            }
        }
        LabelVolume::new(labels, (n, n, n)).unwrap()
    }

    #[test]
    fn test_default_params() {
        let params = FdParams::default();
        assert_eq!(params.scales, vec![22.5, 11.25, 5.625, 2.8125, 1.40625]);
        assert_eq!(params.max_label_id, 9000);
    }

    #[test]
    fn test_process_region_cube() {
        let volume = volume_with_cube(20, 10, 1);
        let result = process_region(&volume, 1, "TestROI", &DEFAULT_SCALES).unwrap();

        assert_eq!(result.roi_id, 1);
        assert_eq!(result.roi_name, "TestROI");
        assert_eq!(result.voxel_count, 1000);
        assert_eq!(result.n_scales, 4);
        let fd = result.fd.unwrap();
        assert!(fd > 1.5 && fd < 3.0, "fd = {fd}");
        assert!(result.r2.unwrap() > 0.9);
    }

    #[test]
    fn test_process_region_absent() {
        let volume = volume_with_cube(8, 4, 1);
        assert!(process_region(&volume, 2, "Missing", &DEFAULT_SCALES).is_none());
    }

    #[test]
    fn test_process_region_too_few_scales() {
        // A 4^3 volume only admits the scales 3 and 1; drop 1 so one remains
        let volume = volume_with_cube(4, 2, 5);
        let result = process_region(&volume, 5, "Tiny", &[22.5, 2.8125]).unwrap();
        assert_eq!(result.voxel_count, 8);
        assert_eq!(result.n_scales, 1);
        assert_eq!(result.fd, None);
        assert_eq!(result.r2, None);
    }

    #[test]
    fn test_process_regions_keeps_input_order() {
        let n = 16;
        let mut labels = vec![0i64; n * n * n];
        for k in 0..n {
            for j in 0..n {
                for i in 0..n {
                    labels[idx3d(i, j, k, n, n)] = match (i < 8, j < 8) {
                        (true, true) => 30,
                        (false, true) => 10,
                        (true, false) => 20,
                        (false, false) => 0,
                    };
                }
            }
        }
        let volume = LabelVolume::new(labels, (n, n, n)).unwrap();
        let regions = vec![
            RegionLabel { id: 20, name: "b".into() },
            RegionLabel { id: 99, name: "absent".into() },
            RegionLabel { id: 30, name: "c".into() },
            RegionLabel { id: 10, name: "a".into() },
        ];

        let results = process_regions(&volume, &regions, &DEFAULT_SCALES);
        let ids: Vec<i64> = results.iter().map(|r| r.roi_id).collect();
        assert_eq!(ids, vec![20, 30, 10]);
        assert!(results.iter().all(|r| r.voxel_count == 8 * 8 * 16));

        let summary = summarize(regions.len(), &results);
        assert_eq!(summary, RunSummary { regions: 4, rows: 3, undefined: 0 });
    }
}
