//! Relaxed metric perturbation below and inside the critical phase.

use std::path::Path;

use plotters::prelude::*;

use crate::domain::{FigureConfig, FigureData, FigureKind, FigureOutput, Series};
use crate::error::AppError;
use crate::models::{RelaxationParams, relax_perturbation};
use crate::plot::style::{BLUE_C, RED_C, WIDE_FIGURE_SIZE, label_font};
use crate::plot::{data_range, draw_masked_line, draw_mesh, is_finite_point, render_svg};

pub const FILE_NAME: &str = "phase_comparison.svg";

pub const LAMBDA_WEAK: f64 = 0.5;
pub const LAMBDA_CRITICAL: f64 = 1.5;

#[derive(Debug, Clone)]
pub struct PhaseComparison {
    pub x: Vec<f64>,
    pub weak: Vec<f64>,
    pub critical: Vec<f64>,
}

pub fn compute(params: &RelaxationParams) -> Result<PhaseComparison, AppError> {
    let (x, weak) = relax_perturbation(LAMBDA_WEAK, params);
    let (_, critical) = relax_perturbation(LAMBDA_CRITICAL, params);
    if weak.iter().chain(critical.iter()).any(|v| !v.is_finite()) {
        return Err(AppError::numerical(format!(
            "Relaxation diverged (dt={}, steps={}).",
            params.dt, params.steps
        )));
    }
    Ok(PhaseComparison { x, weak, critical })
}

impl PhaseComparison {
    pub fn figure_data(&self) -> FigureData {
        let mut data = FigureData::new(FigureKind::WeakCoupling);
        data.series.push(Series::new("delta_h_weak", self.x.clone(), self.weak.clone()));
        data.series.push(Series::new("delta_h_critical", self.x.clone(), self.critical.clone()));
        let peak = |v: &[f64]| v.iter().fold(0.0_f64, |m, h| m.max(h.abs()));
        data.scalars.push(("peak_weak".to_string(), peak(self.weak.as_slice())));
        data.scalars.push(("peak_critical".to_string(), peak(self.critical.as_slice())));
        data
    }
}

pub fn render(c: &PhaseComparison, path: &Path) -> Result<(), AppError> {
    let x_range = data_range(&c.x, 0.0).unwrap_or(-5.0..5.0);

    render_svg(path, WIDE_FIGURE_SIZE, |root| {
        let (w, _) = root.dim_in_pixel();
        let (left, right) = root.split_horizontally(w as i32 / 2);

        let panels = [
            (&left, &c.weak, RED_C, format!("Weak Coupling (λ = {LAMBDA_WEAK}) Divergence"), "Δh_μν"),
            (&right, &c.critical, BLUE_C, format!("Critical Phase (λ = {LAMBDA_CRITICAL}) Stabilization"), ""),
        ];
        for (area, h, color, title, y_desc) in panels {
            let y_range = data_range(h.iter(), 0.08).unwrap_or(0.0..0.1);
            let mut chart = ChartBuilder::on(area)
                .caption(title, label_font())
                .margin(15)
                .x_label_area_size(45)
                .y_label_area_size(80)
                .build_cartesian_2d(x_range.clone(), y_range)?;
            draw_mesh(&mut chart, "Spatial coordinate x [ly]", y_desc)?;
            draw_masked_line(
                &mut chart,
                c.x.iter().copied().zip(h.iter().copied()),
                is_finite_point,
                color.stroke_width(2),
                None,
            )?;
        }
        Ok(())
    })
}

pub fn run(cfg: &FigureConfig) -> Result<FigureOutput, AppError> {
    let c = compute(&RelaxationParams::default())?;
    let path = cfg.out_dir.join(FILE_NAME);
    render(&c, &path)?;
    Ok(FigureOutput {
        figure: FigureKind::WeakCoupling,
        images: vec![path],
        data: c.figure_data(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figures::test_support::scratch_dir;

    #[test]
    fn critical_phase_damps_harder_than_weak_coupling() {
        let c = compute(&RelaxationParams::default()).unwrap();
        let data = c.figure_data();
        let weak = data.scalar("peak_weak").unwrap();
        let critical = data.scalar("peak_critical").unwrap();
        assert!(critical < weak, "critical {critical} vs weak {weak}");
    }

    #[test]
    fn unstable_step_is_reported() {
        let params = RelaxationParams {
            dt: 10.0,
            steps: 2000,
            ..RelaxationParams::default()
        };
        let err = compute(&params).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn renders_with_defaults() {
        let dir = scratch_dir("weak-coupling");
        let out = run(&FigureConfig {
            out_dir: dir.clone(),
            ..FigureConfig::default()
        })
        .unwrap();
        assert_eq!(out.data.series.len(), 2);
        assert!(std::fs::metadata(&out.images[0]).unwrap().len() > 0);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
