//! LISA sensitivity vs the predicted FPIT strain.

use std::path::Path;

use plotters::prelude::*;

use crate::domain::{FigureConfig, FigureData, FigureKind, FigureOutput, Series};
use crate::error::AppError;
use crate::math::log_space;
use crate::models::{fpit_strain, lisa_sensitivity};
use crate::plot::style::{FIGURE_SIZE, caption_font};
use crate::plot::{draw_dashed, draw_legend, draw_masked_line, draw_mesh, render_svg, within};

pub const FILE_NAME: &str = "lisa_curve.svg";

const F_MIN: f64 = 1e-4;
const F_MAX: f64 = 1e-1;
const STRAIN_MIN: f64 = 1e-24;
const STRAIN_MAX: f64 = 1e-18;

#[derive(Debug, Clone)]
pub struct SensitivityCurves {
    pub frequency: Vec<f64>,
    pub lisa: Vec<f64>,
    pub fpit: Vec<f64>,
}

pub fn compute(points: usize) -> Result<SensitivityCurves, AppError> {
    let frequency = log_space(F_MIN, F_MAX, points)?;
    let lisa = frequency.iter().map(|&f| lisa_sensitivity(f)).collect();
    let fpit = frequency.iter().map(|&f| fpit_strain(f)).collect();
    Ok(SensitivityCurves { frequency, lisa, fpit })
}

impl SensitivityCurves {
    pub fn figure_data(&self) -> FigureData {
        let mut data = FigureData::new(FigureKind::Lisa);
        data.series.push(Series::new("lisa_sensitivity", self.frequency.clone(), self.lisa.clone()));
        data.series.push(Series::new("fpit_signal", self.frequency.clone(), self.fpit.clone()));
        if let Some((f, s)) = self.bucket() {
            data.scalars.push(("bucket_frequency".to_string(), f));
            data.scalars.push(("bucket_sensitivity".to_string(), s));
        }
        data
    }

    /// Frequency and value of the most sensitive point.
    pub fn bucket(&self) -> Option<(f64, f64)> {
        self.frequency
            .iter()
            .copied()
            .zip(self.lisa.iter().copied())
            .filter(|(_, s)| s.is_finite())
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }
}

pub fn render(c: &SensitivityCurves, path: &Path) -> Result<(), AppError> {
    render_svg(path, FIGURE_SIZE, |root| {
        let mut chart = ChartBuilder::on(root)
            .caption("LISA Sensitivity vs FPIT Gravitational Wave Signals", caption_font())
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(80)
            .build_cartesian_2d((F_MIN..F_MAX).log_scale(), (STRAIN_MIN..STRAIN_MAX).log_scale())?;
        draw_mesh(&mut chart, "Frequency [Hz]", "Characteristic strain (h/√Hz)")?;

        draw_masked_line(
            &mut chart,
            c.frequency.iter().copied().zip(c.lisa.iter().copied()),
            within(STRAIN_MIN..STRAIN_MAX),
            BLACK.stroke_width(2),
            Some("LISA sensitivity (Robson+2019)"),
        )?;

        let keep = within(STRAIN_MIN..STRAIN_MAX);
        let visible: Vec<(f64, f64)> = c
            .frequency
            .iter()
            .copied()
            .zip(c.fpit.iter().copied())
            .filter(|&(f, s)| keep(f, s))
            .collect();
        draw_dashed(&mut chart, visible, RED.stroke_width(2), Some("FPIT predicted signal"))?;

        draw_legend(&mut chart)?;
        Ok(())
    })
}

pub fn run(cfg: &FigureConfig) -> Result<FigureOutput, AppError> {
    let curves = compute(300)?;
    let path = cfg.out_dir.join(FILE_NAME);
    render(&curves, &path)?;
    Ok(FigureOutput {
        figure: FigureKind::Lisa,
        images: vec![path],
        data: curves.figure_data(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figures::test_support::scratch_dir;

    #[test]
    fn bucket_lies_inside_the_plotted_window() {
        let c = compute(300).unwrap();
        let (f, s) = c.bucket().unwrap();
        assert!(f > F_MIN && f < F_MAX);
        assert!(s > STRAIN_MIN && s < STRAIN_MAX);
    }

    #[test]
    fn renders_with_defaults() {
        let dir = scratch_dir("lisa");
        let out = run(&FigureConfig {
            out_dir: dir.clone(),
            ..FigureConfig::default()
        })
        .unwrap();
        assert!(std::fs::metadata(&out.images[0]).unwrap().len() > 0);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
