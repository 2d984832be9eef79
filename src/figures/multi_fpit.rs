//! Interference of two constraint fields with slightly different widths.

use std::path::Path;

use plotters::prelude::*;

use crate::domain::{FigureConfig, FigureData, FigureKind, FigureOutput, Series};
use crate::error::AppError;
use crate::math::linspace;
use crate::models::multi_fpit_constraint;
use crate::plot::style::{FIGURE_SIZE, PALETTE, caption_font};
use crate::plot::{data_range, draw_legend, draw_masked_line, draw_mesh, is_finite_point, render_svg};

pub const FILE_NAME: &str = "multi_fpit_interference.svg";

pub const LAMBDAS: [f64; 3] = [0.5, 1.0, 2.0];

#[derive(Debug, Clone)]
pub struct Interference {
    pub x: Vec<f64>,
    /// One `C_tt` profile per entry of [`LAMBDAS`].
    pub profiles: Vec<(f64, Vec<f64>)>,
}

pub fn compute(sigma1: f64, sigma2: f64, points: usize) -> Interference {
    let x = linspace(-15.0, 15.0, points);
    let profiles = LAMBDAS
        .iter()
        .map(|&lambda| {
            let c = x
                .iter()
                .map(|&xi| multi_fpit_constraint(xi, sigma1, sigma2, lambda))
                .collect();
            (lambda, c)
        })
        .collect();
    Interference { x, profiles }
}

impl Interference {
    pub fn figure_data(&self) -> FigureData {
        let mut data = FigureData::new(FigureKind::MultiFpit);
        for (lambda, c) in &self.profiles {
            data.series.push(Series::new(format!("c_tt_lambda_{lambda}"), self.x.clone(), c.clone()));
        }
        data
    }
}

pub fn render(inter: &Interference, path: &Path) -> Result<(), AppError> {
    let y_range = data_range(inter.profiles.iter().flat_map(|(_, c)| c.iter()), 0.05).unwrap_or(0.0..1.0);

    render_svg(path, FIGURE_SIZE, |root| {
        let mut chart = ChartBuilder::on(root)
            .caption("Multi-FPIT Causal Interference (Δσ = 0.2λ)", caption_font())
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d(-15.0..15.0, y_range.clone())?;
        draw_mesh(&mut chart, "Spatial coordinate x", "Constraint C_tt")?;

        for ((lambda, c), color) in inter.profiles.iter().zip(PALETTE.iter()) {
            let label = format!("λ = {lambda}");
            draw_masked_line(
                &mut chart,
                inter.x.iter().copied().zip(c.iter().copied()),
                is_finite_point,
                color.stroke_width(2),
                Some(label.as_str()),
            )?;
        }
        draw_legend(&mut chart)?;
        Ok(())
    })
}

pub fn run(cfg: &FigureConfig) -> Result<FigureOutput, AppError> {
    let inter = compute(1.0, 1.2, 1000);
    let path = cfg.out_dir.join(FILE_NAME);
    render(&inter, &path)?;
    Ok(FigureOutput {
        figure: FigureKind::MultiFpit,
        images: vec![path],
        data: inter.figure_data(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figures::test_support::scratch_dir;

    #[test]
    fn stronger_coupling_scales_the_peaks() {
        let inter = compute(1.0, 1.2, 1001);
        let peak = |c: &[f64]| c.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let peaks: Vec<f64> = inter.profiles.iter().map(|(_, c)| peak(c.as_slice())).collect();
        assert!(peaks[0] < peaks[1] && peaks[1] < peaks[2]);
        // Midway between the centres the fields have decayed away.
        assert!(inter.profiles[2].1[500] < 1e-6);
    }

    #[test]
    fn renders_with_defaults() {
        let dir = scratch_dir("multi-fpit");
        let out = run(&FigureConfig {
            out_dir: dir.clone(),
            ..FigureConfig::default()
        })
        .unwrap();
        assert_eq!(out.data.series.len(), 3);
        assert!(std::fs::metadata(&out.images[0]).unwrap().len() > 0);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
