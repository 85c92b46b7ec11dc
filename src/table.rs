//! Result table output: one CSV row per region.

use std::borrow::Cow;
use std::io::Write;
use std::path::Path;

use crate::error::{FdError, FdResult};
use crate::pipeline::RegionResult;

/// Column header of the result table
pub const HEADER: &str = "roi_id,roi_name,n_vox,fd,r2,n_scales";

/// Quote a text field if it holds a separator, quote or line break
fn csv_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

/// Shortest round-trip form; undefined values are empty
fn float_field(value: Option<f64>) -> String {
    value.map(|v| format!("{v:?}")).unwrap_or_default()
}

/// Write the table to any writer
pub fn write_table<W: Write>(w: &mut W, results: &[RegionResult]) -> std::io::Result<()> {
    writeln!(w, "{HEADER}")?;

    for r in results {
        writeln!(
            w,
            "{},{},{},{},{},{}",
            r.roi_id,
            csv_field(&r.roi_name),
            r.voxel_count,
            float_field(r.fd),
            float_field(r.r2),
            r.n_scales,
        )?;
    }

    w.flush()
}

/// Render the whole table, then write it to `path` in one call
pub fn save_table(path: &Path, results: &[RegionResult]) -> FdResult<()> {
    let mut buffer = Vec::new();
    write_table(&mut buffer, results).map_err(|e| FdError::write_file(path, e))?;
    std::fs::write(path, &buffer).map_err(|e| FdError::write_file(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(roi_id: i64, name: &str, fd: Option<f64>, r2: Option<f64>, n_scales: usize) -> RegionResult {
        RegionResult {
            roi_id,
            roi_name: name.to_string(),
            voxel_count: 1000,
            fd,
            r2,
            n_scales,
        }
    }

    fn render(results: &[RegionResult]) -> String {
        let mut buffer = Vec::new();
        write_table(&mut buffer, results).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_header_only() {
        assert_eq!(render(&[]), "roi_id,roi_name,n_vox,fd,r2,n_scales\n");
    }

    #[test]
    fn test_rows() {
        let text = render(&[
            result(2001, "Precentral_L", Some(2.5), Some(0.98), 4),
            result(2002, "Precentral_R", Some(2.0), Some(1.0), 2),
            result(7, "Tiny", None, None, 1),
        ]);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], "2001,Precentral_L,1000,2.5,0.98,4");
        assert_eq!(lines[2], "2002,Precentral_R,1000,2.0,1.0,2");
        assert_eq!(lines[3], "7,Tiny,1000,,,1");
    }

    #[test]
    fn test_name_quoting() {
        let text = render(&[result(1, "Cingulum, \"mid\"", None, None, 0)]);
        assert_eq!(text.lines().nth(1).unwrap(), "1,\"Cingulum, \"\"mid\"\"\",1000,,,0");
    }

    #[test]
    fn test_save_table_bad_path() {
        let err = save_table(Path::new("/nonexistent_dir_12345/out.csv"), &[]).unwrap_err();
        assert!(matches!(err, FdError::WriteFile { .. }));
    }
}
