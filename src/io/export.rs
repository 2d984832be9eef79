//! Export a figure's 1-D series to CSV.
//!
//! The layout is long format (`series,x,y`), one row per sample, so series of
//! different lengths share one file. Missing values are written as `NaN`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::domain::FigureData;
use crate::error::AppError;

fn csv_value(v: f64) -> String {
    if v.is_finite() { format!("{v:.10e}") } else { "NaN".to_string() }
}

/// Labels containing separators or quotes are quoted.
fn csv_label(label: &str) -> String {
    if label.contains([',', '"', '\n']) {
        format!("\"{}\"", label.replace('"', "\"\""))
    } else {
        label.to_string()
    }
}

/// Write every series of `data` to `path`.
pub fn write_series_csv(path: &Path, data: &FigureData) -> Result<(), AppError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| AppError::invalid(format!("Failed to create '{}': {e}", parent.display())))?;
    }
    let file = File::create(path)
        .map_err(|e| AppError::invalid(format!("Failed to create export CSV '{}': {e}", path.display())))?;
    let mut w = BufWriter::new(file);

    writeln!(w, "series,x,y").map_err(|e| AppError::invalid(format!("Failed to write export CSV header: {e}")))?;

    for s in &data.series {
        let label = csv_label(&s.label);
        for (x, y) in s.x.iter().zip(s.y.iter()) {
            writeln!(w, "{label},{},{}", csv_value(*x), csv_value(*y))
                .map_err(|e| AppError::invalid(format!("Failed to write export CSV row: {e}")))?;
        }
    }

    w.flush()
        .map_err(|e| AppError::invalid(format!("Failed to flush export CSV '{}': {e}", path.display())))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FigureKind, Series};
    use crate::figures::test_support::scratch_dir;

    #[test]
    fn writes_long_format_with_nan_gaps() {
        let dir = scratch_dir("export-csv");
        let path = dir.join("nested").join("data.csv");
        let mut data = FigureData::new(FigureKind::Decoherence);
        data.series.push(Series::new("synthetic", vec![0.0, 1.0], vec![1.0, 0.5]));
        data.series.push(Series::new("lindblad", vec![0.0, 1.0], vec![1.0, f64::NAN]));

        write_series_csv(&path, &data).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "series,x,y");
        assert!(lines[1].starts_with("synthetic,0.0000000000e0,1.0000000000e0"));
        assert!(lines[4].starts_with("lindblad,") && lines[4].ends_with(",NaN"));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn quotes_labels_with_commas() {
        assert_eq!(csv_label("a,b"), "\"a,b\"");
        assert_eq!(csv_label("plain"), "plain");
    }
}
