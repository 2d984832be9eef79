//! JSON export of a figure run.
//!
//! The envelope (`domain::FigureExport`) records which tool and figure
//! produced the data and when. Non-finite samples serialize as `null`.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use chrono::Utc;

use crate::domain::{FigureExport, FigureOutput};
use crate::error::AppError;

pub const TOOL_NAME: &str = "fpit";

pub fn export_envelope(output: &FigureOutput) -> FigureExport {
    FigureExport {
        tool: TOOL_NAME.to_string(),
        figure: output.figure.slug().to_string(),
        generated_at: Utc::now(),
        images: output.images.clone(),
        data: output.data.clone(),
    }
}

/// Write the run's data as pretty-printed JSON.
pub fn write_figure_json(path: &Path, output: &FigureOutput) -> Result<(), AppError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| AppError::invalid(format!("Failed to create '{}': {e}", parent.display())))?;
    }
    let file = File::create(path)
        .map_err(|e| AppError::invalid(format!("Failed to create export JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(BufWriter::new(file), &export_envelope(output))
        .map_err(|e| AppError::invalid(format!("Failed to write export JSON: {e}")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FigureData, FigureKind, Series};
    use crate::figures::test_support::scratch_dir;

    #[test]
    fn envelope_carries_slug_and_timestamp() {
        let dir = scratch_dir("export-json");
        let path = dir.join("run.json");
        let mut data = FigureData::new(FigureKind::GwWaveform);
        data.series.push(Series::new("fpit_burst", vec![0.0, 1.0], vec![1.0, f64::NAN]));
        data.scalars.push(("peak".to_string(), 1.0));
        let output = FigureOutput {
            figure: FigureKind::GwWaveform,
            images: vec![dir.join("gw_waveform.svg")],
            data,
        };

        write_figure_json(&path, &output).unwrap();
        let v: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(v["tool"], "fpit");
        assert_eq!(v["figure"], "gw-waveform");
        assert_eq!(v["data"]["figure"], "gw-waveform");
        assert!(v["data"]["series"][0]["y"][1].is_null());
        let stamp = v["generated_at"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(stamp).is_ok());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
