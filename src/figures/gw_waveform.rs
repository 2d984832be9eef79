//! FPIT burst vs binary black hole chirp in the time domain.

use std::path::Path;

use plotters::prelude::*;

use crate::domain::{FigureConfig, FigureData, FigureKind, FigureOutput, Series};
use crate::error::AppError;
use crate::math::{chirp_hyperbolic_frequency, linspace};
use crate::models::{BurstParams, ChirpParams, bbh_chirp, fpit_burst, normalize_peak};
use crate::plot::style::{FIGURE_SIZE, annotation_font, caption_font};
use crate::plot::{draw_dashed, draw_legend, draw_masked_line, draw_mesh, is_finite_point, render_svg};

pub const FILE_NAME: &str = "gw_waveform.svg";

/// Sampling rate (Hz).
pub const SAMPLE_RATE: f64 = 100_000.0;
/// Window length (s).
pub const WINDOW: f64 = 0.02;

#[derive(Debug, Clone)]
pub struct Waveforms {
    pub time_ms: Vec<f64>,
    pub fpit: Vec<f64>,
    pub bbh: Vec<f64>,
    /// Chirp frequency (Hz) at the start and end of the window.
    pub chirp_band: (f64, f64),
}

pub fn compute(burst: &BurstParams, chirp: &ChirpParams) -> Waveforms {
    let n = (SAMPLE_RATE * WINDOW).round() as usize;
    let t = linspace(0.0, WINDOW, n);

    let mut fpit: Vec<f64> = t.iter().map(|&ti| fpit_burst(ti, burst)).collect();
    let mut bbh: Vec<f64> = t.iter().map(|&ti| bbh_chirp(ti, chirp)).collect();
    normalize_peak(&mut fpit);
    normalize_peak(&mut bbh);

    Waveforms {
        time_ms: t.iter().map(|ti| ti * 1000.0).collect(),
        fpit,
        bbh,
        chirp_band: (
            chirp_hyperbolic_frequency(0.0, chirp.f0, chirp.t1, chirp.f1),
            chirp_hyperbolic_frequency(WINDOW, chirp.f0, chirp.t1, chirp.f1),
        ),
    }
}

impl Waveforms {
    pub fn figure_data(&self) -> FigureData {
        let mut data = FigureData::new(FigureKind::GwWaveform);
        data.series.push(Series::new("fpit_burst", self.time_ms.clone(), self.fpit.clone()));
        data.series.push(Series::new("bbh_merger", self.time_ms.clone(), self.bbh.clone()));
        data.scalars.push(("chirp_f_start_hz".to_string(), self.chirp_band.0));
        data.scalars.push(("chirp_f_end_hz".to_string(), self.chirp_band.1));
        data
    }
}

pub fn render(w: &Waveforms, path: &Path) -> Result<(), AppError> {
    render_svg(path, FIGURE_SIZE, |root| {
        let mut chart = ChartBuilder::on(root)
            .caption("Gravitational Waveform Comparison", caption_font())
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d(0.0..20.0, -1.1..1.1)?;
        draw_mesh(&mut chart, "Time (ms)", "Normalized strain")?;

        draw_masked_line(
            &mut chart,
            w.time_ms.iter().copied().zip(w.fpit.iter().copied()),
            is_finite_point,
            RED.stroke_width(2),
            Some("FPIT burst"),
        )?;

        draw_dashed(
            &mut chart,
            w.time_ms.iter().copied().zip(w.bbh.iter().copied()).collect(),
            BLUE.stroke_width(2),
            Some("BBH merger"),
        )?;

        let red_text = annotation_font().color(&RED);
        let blue_text = annotation_font().color(&BLUE);
        chart.draw_series([
            Text::new("Quasi-monochromatic", (3.0, 0.85), red_text.clone()),
            Text::new("~200 Hz", (4.0, 0.75), red_text),
            Text::new("Chirp: 50-300 Hz", (13.0, -0.8), blue_text),
        ])?;

        draw_legend(&mut chart)?;
        Ok(())
    })
}

pub fn run(cfg: &FigureConfig) -> Result<FigureOutput, AppError> {
    let w = compute(&BurstParams::default(), &ChirpParams::default());
    let path = cfg.out_dir.join(FILE_NAME);
    render(&w, &path)?;
    Ok(FigureOutput {
        figure: FigureKind::GwWaveform,
        images: vec![path],
        data: w.figure_data(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figures::test_support::scratch_dir;

    #[test]
    fn waveforms_are_unit_peak_over_twenty_ms() {
        let w = compute(&BurstParams::default(), &ChirpParams::default());
        assert_eq!(w.time_ms.len(), 2000);
        assert!((w.time_ms[1999] - 20.0).abs() < 1e-12);
        let peak = |v: &[f64]| v.iter().fold(0.0_f64, |m, x| m.max(x.abs()));
        assert!((peak(w.fpit.as_slice()) - 1.0).abs() < 1e-12);
        assert!((peak(w.bbh.as_slice()) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn chirp_band_spans_fifty_to_three_hundred_hz() {
        let data = compute(&BurstParams::default(), &ChirpParams::default()).figure_data();
        assert!((data.scalar("chirp_f_start_hz").unwrap() - 50.0).abs() < 1e-9);
        assert!((data.scalar("chirp_f_end_hz").unwrap() - 300.0).abs() < 1e-9);
    }

    #[test]
    fn renders_with_defaults() {
        let dir = scratch_dir("gw-waveform");
        let out = run(&FigureConfig {
            out_dir: dir.clone(),
            ..FigureConfig::default()
        })
        .unwrap();
        assert!(std::fs::metadata(&out.images[0]).unwrap().len() > 0);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
