//! Error types for atlas loading, label parsing and result output.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for fallible atlas-fd operations.
pub type FdResult<T> = Result<T, FdError>;

/// Errors that abort a run.
///
/// Per-region degeneracies (absent regions, too few scales) are not errors;
/// they surface as skipped regions or undefined fits.
#[derive(Debug, Error)]
pub enum FdError {
    /// An input file could not be read.
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The output file could not be written.
    #[error("failed to write file '{path}': {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The bytes are not a readable NIfTI image.
    #[error("failed to read NIfTI: {0}")]
    Nifti(String),

    /// The image was read but its geometry is unusable.
    #[error("invalid volume: {0}")]
    InvalidVolume(String),

    /// The label dictionary is not valid JSON of the expected shape.
    #[error("malformed label dictionary: {0}")]
    LabelJson(#[from] serde_json::Error),

    /// A label entry could not be interpreted.
    #[error("invalid label entry: {0}")]
    InvalidLabel(String),
}

impl FdError {
    /// Create a read error for `path`.
    #[must_use]
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadFile { path: path.into(), source }
    }

    /// Create a write error for `path`.
    #[must_use]
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::WriteFile { path: path.into(), source }
    }

    /// Create an invalid volume error.
    #[must_use]
    pub fn invalid_volume(details: impl Into<String>) -> Self {
        Self::InvalidVolume(details.into())
    }

    /// Create an invalid label error.
    #[must_use]
    pub fn invalid_label(details: impl Into<String>) -> Self {
        Self::InvalidLabel(details.into())
    }
}
