//! Atlas label dictionary
//!
//! The dictionary is a JSON array of objects with at least `id` and `name`.
//! Ids may be written as integers, floats or numeric strings; they are
//! coerced to integers the same way for filtering and for matching voxels.

use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::error::{FdError, FdResult};

/// Ids at or above this value are not part of the AAL-90 naming scheme
pub const DEFAULT_MAX_LABEL_ID: i64 = 9000;

/// One atlas region
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegionLabel {
    pub id: i64,
    pub name: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Int(i64),
    Float(f64),
    Text(String),
}

#[derive(Deserialize)]
struct RawLabel {
    id: RawId,
    name: String,
}

impl RawId {
    fn to_id(&self) -> FdResult<i64> {
        match self {
            RawId::Int(v) => Ok(*v),
            RawId::Float(v) if v.is_finite() => Ok(v.trunc() as i64),
            RawId::Float(v) => Err(FdError::invalid_label(format!("id {v} is not finite"))),
            RawId::Text(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| FdError::invalid_label(format!("id '{s}' is not an integer"))),
        }
    }
}

/// Parse a label dictionary from JSON text
///
/// Entries keep their file order. Fields other than `id` and `name` are
/// ignored.
pub fn parse_labels(json: &str) -> FdResult<Vec<RegionLabel>> {
    let raw: Vec<RawLabel> = serde_json::from_str(json)?;
    raw.into_iter()
        .map(|r| {
            Ok(RegionLabel {
                id: r.id.to_id()?,
                name: r.name,
            })
        })
        .collect()
}

/// Read and parse a label dictionary file
pub fn read_labels_file(path: &Path) -> FdResult<Vec<RegionLabel>> {
    let text = std::fs::read_to_string(path).map_err(|e| FdError::read_file(path, e))?;
    parse_labels(&text)
}

/// Keep the regions with `id < max_label_id`, in order
pub fn filter_atlas_regions(labels: Vec<RegionLabel>, max_label_id: i64) -> Vec<RegionLabel> {
    let total = labels.len();
    let kept: Vec<RegionLabel> = labels
        .into_iter()
        .filter(|l| l.id < max_label_id)
        .collect();
    info!(total, kept = kept.len(), max_label_id, "filtered label dictionary");
    kept
}
