//! atlas-fd: surface fractal dimension of atlas regions
//!
//! Estimates the box-counting fractal dimension (FD) of the boundary surface
//! of every region of a labeled 3D brain atlas.
//!
//! # Modules
//! - `fractal`: boundary extraction, box counting and the log-log fit
//! - `pipeline`: per-region processing and the full run
//! - `volume`: integer label volume
//! - `labels`: label dictionary parsing and filtering
//! - `nifti_io`: NIfTI atlas reading and label map writing
//! - `table`: CSV result output

pub mod error;

// Algorithm modules
pub mod fractal;
pub mod pipeline;
pub mod volume;

// I/O modules
pub mod labels;
pub mod nifti_io;
pub mod table;

pub use error::{FdError, FdResult};
pub use pipeline::{process_region, process_regions, run, FdParams, RegionResult, RunConfig, RunSummary, DEFAULT_SCALES};
pub use volume::LabelVolume;
