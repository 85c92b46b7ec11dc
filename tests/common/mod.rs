//! Common fixtures for atlas-fd integration tests

use std::path::{Path, PathBuf};

use atlas_fd::nifti_io::write_label_volume;
use atlas_fd::volume::idx3d;
use atlas_fd::{FdParams, LabelVolume, RunConfig};

pub const IDENTITY: [f64; 16] = [
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 1.0, 0.0,
    0.0, 0.0, 0.0, 1.0,
];

/// Label the axis-aligned box [lo, hi) with `label`
pub fn fill_box(
    labels: &mut [i64],
    dims: (usize, usize, usize),
    lo: (usize, usize, usize),
    hi: (usize, usize, usize),
    label: i64,
) {
    let (nx, ny, _) = dims;
    for k in lo.2..hi.2 {
        for j in lo.1..hi.1 {
            for i in lo.0..hi.0 {
                labels[idx3d(i, j, k, nx, ny)] = label;
            }
        }
    }
}

/// Label the voxels within `radius` of `center` with `label`
pub fn fill_sphere(
    labels: &mut [i64],
    dims: (usize, usize, usize),
    center: (f64, f64, f64),
    radius: f64,
    label: i64,
) {
    let (nx, ny, nz) = dims;
    let r2 = radius * radius;
    for k in 0..nz {
        for j in 0..ny {
            for i in 0..nx {
                let dx = i as f64 - center.0;
                let dy = j as f64 - center.1;
                let dz = k as f64 - center.2;
                if dx * dx + dy * dy + dz * dz <= r2 {
                    labels[idx3d(i, j, k, nx, ny)] = label;
                }
            }
        }
    }
}

/// 20^3 volume with a solid 10^3 cube labeled 1 at the origin corner
pub fn corner_cube_volume() -> LabelVolume {
    let dims = (20, 20, 20);
    let mut labels = vec![0i64; 20 * 20 * 20];
    fill_box(&mut labels, dims, (0, 0, 0), (10, 10, 10), 1);
    LabelVolume::new(labels, dims).unwrap()
}

/// Files of one run inside a scratch directory
pub struct Fixture {
    pub dir: tempfile::TempDir,
    pub config: RunConfig,
}

impl Fixture {
    /// Write `volume` and `labels_json` to a fresh directory
    pub fn new(volume: &LabelVolume, labels_json: &str, atlas_name: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let atlas = dir.path().join(atlas_name);
        write_label_volume(&atlas, volume, (1.0, 1.0, 1.0), &IDENTITY).unwrap();
        let labels = write_text(dir.path(), "labels.json", labels_json);
        let out = dir.path().join("fd.csv");

        Fixture {
            config: RunConfig {
                atlas,
                labels_json: labels,
                out,
                params: FdParams::default(),
            },
            dir,
        }
    }

    pub fn output(&self) -> String {
        std::fs::read_to_string(&self.config.out).unwrap()
    }
}

pub fn write_text(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, text).unwrap();
    path
}

/// Split a CSV row on commas (names in fixtures are unquoted)
pub fn fields(line: &str) -> Vec<&str> {
    line.split(',').collect()
}
