//! NIfTI file I/O for atlas label volumes
//!
//! Reads .nii and .nii.gz images (gzip is auto-detected) into a
//! `LabelVolume`, and writes label volumes back as INT32 NIfTI-1.

use std::io::{Cursor, Read, Write};
use std::path::Path;

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use ndarray::Array;
use nifti::volume::ndarray::IntoNdArray;
use nifti::{InMemNiftiObject, NiftiHeader, NiftiObject};

use crate::error::{FdError, FdResult};
use crate::volume::LabelVolume;

/// NIfTI data loaded from bytes
pub struct NiftiData {
    /// Scaled voxel values in Fortran order (x fastest)
    pub data: Vec<f64>,
    /// Dimensions (nx, ny, nz); 4D inputs keep only the first volume
    pub dims: (usize, usize, usize),
    /// Voxel sizes in mm
    pub voxel_size: (f64, f64, f64),
    /// Affine transformation matrix (4x4, row-major)
    pub affine: [f64; 16],
}

/// An atlas read from disk
pub struct AtlasImage {
    pub volume: LabelVolume,
    pub voxel_size: (f64, f64, f64),
    pub affine: [f64; 16],
}

/// Check if bytes are gzip compressed
fn is_gzip(bytes: &[u8]) -> bool {
    bytes.len() >= 2 && bytes[0] == 0x1f && bytes[1] == 0x8b
}

/// Get header info for diagnostics
fn get_header_info(bytes: &[u8]) -> String {
    if bytes.len() < 348 {
        return format!("file too small ({} bytes, need at least 348)", bytes.len());
    }

    let sizeof_hdr = i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    let magic = String::from_utf8_lossy(&bytes[344..348]).to_string();
    let datatype = i16::from_le_bytes([bytes[70], bytes[71]]);

    format!("sizeof_hdr={}, magic='{}', datatype={}", sizeof_hdr, magic, datatype)
}

/// Load a NIfTI image from bytes
///
/// Supports both .nii and .nii.gz content. Values are returned with
/// scl_slope/scl_inter applied.
pub fn load_nifti(bytes: &[u8]) -> FdResult<NiftiData> {
    let obj: InMemNiftiObject = if is_gzip(bytes) {
        InMemNiftiObject::from_reader(GzDecoder::new(Cursor::new(bytes)))
            .map_err(|e| {
                let mut decompressed = Vec::new();
                let info = if GzDecoder::new(Cursor::new(bytes)).read_to_end(&mut decompressed).is_ok() {
                    get_header_info(&decompressed)
                } else {
                    "could not decompress".to_string()
                };
                FdError::Nifti(format!("gzipped image: {} ({})", e, info))
            })?
    } else {
        InMemNiftiObject::from_reader(Cursor::new(bytes))
            .map_err(|e| FdError::Nifti(format!("{} ({})", e, get_header_info(bytes))))?
    };

    let header = obj.header();
    let ndim = header.dim[0] as usize;
    if ndim < 3 {
        return Err(FdError::invalid_volume(format!("expected at least 3D volume, got {}D", ndim)));
    }

    let pixdim = header.pixdim;
    let voxel_size = (pixdim[1] as f64, pixdim[2] as f64, pixdim[3] as f64);
    let affine = get_affine(header);

    let array: Array<f64, _> = obj
        .into_volume()
        .into_ndarray()
        .map_err(|e| FdError::Nifti(format!("failed to convert to ndarray: {}", e)))?;

    let shape = array.shape().to_vec();
    if shape.len() < 3 {
        return Err(FdError::invalid_volume(format!("expected at least 3D array, got {}D", shape.len())));
    }

    // nifti-rs may reorder, so the array shape is authoritative
    let (dim0, dim1, dim2) = (shape[0], shape[1], shape[2]);
    let mut data = Vec::with_capacity(dim0 * dim1 * dim2);

    if shape.len() == 3 {
        for k in 0..dim2 {
            for j in 0..dim1 {
                for i in 0..dim0 {
                    data.push(array[[i, j, k]]);
                }
            }
        }
    } else {
        // First volume of a 4D+ image
        for k in 0..dim2 {
            for j in 0..dim1 {
                for i in 0..dim0 {
                    let mut index = vec![0usize; shape.len()];
                    index[0] = i;
                    index[1] = j;
                    index[2] = k;
                    data.push(array[index.as_slice()]);
                }
            }
        }
    }

    Ok(NiftiData {
        data,
        dims: (dim0, dim1, dim2),
        voxel_size,
        affine,
    })
}

/// Get affine transformation matrix from header
fn get_affine(header: &NiftiHeader) -> [f64; 16] {
    // Prefer sform if available (sform_code > 0)
    if header.sform_code > 0 {
        let s = &header.srow_x;
        let t = &header.srow_y;
        let u = &header.srow_z;
        [
            s[0] as f64, s[1] as f64, s[2] as f64, s[3] as f64,
            t[0] as f64, t[1] as f64, t[2] as f64, t[3] as f64,
            u[0] as f64, u[1] as f64, u[2] as f64, u[3] as f64,
            0.0, 0.0, 0.0, 1.0,
        ]
    } else {
        let vsx = header.pixdim[1] as f64;
        let vsy = header.pixdim[2] as f64;
        let vsz = header.pixdim[3] as f64;
        [
            vsx, 0.0, 0.0, 0.0,
            0.0, vsy, 0.0, 0.0,
            0.0, 0.0, vsz, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ]
    }
}

/// Read an atlas image and convert its voxels to integer labels
pub fn read_atlas(path: &Path) -> FdResult<AtlasImage> {
    let bytes = std::fs::read(path).map_err(|e| FdError::read_file(path, e))?;
    let nifti = load_nifti(&bytes)?;
    let volume = LabelVolume::from_values(&nifti.data, nifti.dims)?;
    Ok(AtlasImage {
        volume,
        voxel_size: nifti.voxel_size,
        affine: nifti.affine,
    })
}

/// Encode a label volume as uncompressed INT32 NIfTI-1 bytes
pub fn save_nifti(
    volume: &LabelVolume,
    voxel_size: (f64, f64, f64),
    affine: &[f64; 16],
) -> FdResult<Vec<u8>> {
    let (nx, ny, nz) = volume.dims();
    let dim_i16 = |d: usize| {
        i16::try_from(d).map_err(|_| FdError::invalid_volume(format!("dimension {} exceeds NIfTI-1 limit", d)))
    };
    let (vsx, vsy, vsz) = voxel_size;

    let mut header = [0u8; 348];

    // sizeof_hdr = 348
    header[0..4].copy_from_slice(&348i32.to_le_bytes());

    let dim: [i16; 8] = [3, dim_i16(nx)?, dim_i16(ny)?, dim_i16(nz)?, 1, 1, 1, 1];
    for (i, &d) in dim.iter().enumerate() {
        let offset = 40 + i * 2;
        header[offset..offset + 2].copy_from_slice(&d.to_le_bytes());
    }

    // datatype = 8 (INT32), bitpix = 32
    header[70..72].copy_from_slice(&8i16.to_le_bytes());
    header[72..74].copy_from_slice(&32i16.to_le_bytes());

    let pixdim: [f32; 8] = [1.0, vsx as f32, vsy as f32, vsz as f32, 1.0, 1.0, 1.0, 1.0];
    for (i, &p) in pixdim.iter().enumerate() {
        let offset = 76 + i * 4;
        header[offset..offset + 4].copy_from_slice(&p.to_le_bytes());
    }

    // vox_offset = 352 (header + 4 bytes extension)
    header[108..112].copy_from_slice(&352.0f32.to_le_bytes());
    // scl_slope = 1.0, scl_inter = 0.0
    header[112..116].copy_from_slice(&1.0f32.to_le_bytes());
    header[116..120].copy_from_slice(&0.0f32.to_le_bytes());
    // sform_code = 1 (scanner anat)
    header[254..256].copy_from_slice(&1i16.to_le_bytes());

    for row in 0..3 {
        for col in 0..4 {
            let offset = 280 + row * 16 + col * 4;
            header[offset..offset + 4].copy_from_slice(&(affine[row * 4 + col] as f32).to_le_bytes());
        }
    }

    // magic = "n+1\0" for NIfTI-1 single file
    header[344..348].copy_from_slice(b"n+1\0");

    let mut buffer = Vec::with_capacity(352 + volume.len() * 4);
    buffer.extend_from_slice(&header);
    buffer.extend_from_slice(&[0u8; 4]);

    for &label in volume.labels() {
        let value = i32::try_from(label)
            .map_err(|_| FdError::invalid_volume(format!("label {} does not fit INT32", label)))?;
        buffer.extend_from_slice(&value.to_le_bytes());
    }

    Ok(buffer)
}

/// Encode a label volume as gzipped NIfTI-1 bytes (.nii.gz)
pub fn save_nifti_gz(
    volume: &LabelVolume,
    voxel_size: (f64, f64, f64),
    affine: &[f64; 16],
) -> FdResult<Vec<u8>> {
    let uncompressed = save_nifti(volume, voxel_size, affine)?;

    let gzip_err = |e: std::io::Error| FdError::Nifti(format!("gzip compression failed: {}", e));
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&uncompressed).map_err(gzip_err)?;
    encoder.finish().map_err(gzip_err)
}

/// Write a label volume to a file
///
/// Paths ending in .nii.gz are gzip compressed.
pub fn write_label_volume(
    path: &Path,
    volume: &LabelVolume,
    voxel_size: (f64, f64, f64),
    affine: &[f64; 16],
) -> FdResult<()> {
    let bytes = if path.to_string_lossy().ends_with(".nii.gz") {
        save_nifti_gz(volume, voxel_size, affine)?
    } else {
        save_nifti(volume, voxel_size, affine)?
    };

    std::fs::write(path, &bytes).map_err(|e| FdError::write_file(path, e))
}
