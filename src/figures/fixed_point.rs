//! Fixed point dynamics: geodesic convergence and metric suppression.

use std::path::Path;

use nalgebra::Vector2;
use plotters::prelude::*;

use crate::domain::{FigureConfig, FigureData, FigureKind, FigureOutput, Field2d, Series};
use crate::error::AppError;
use crate::math::{OdeOptions, integrate, linspace, meshgrid};
use crate::models::{geodesic_rhs, metric_suppression};
use crate::plot::style::{RED_C, caption_font, label_font, viridis_steps};
use crate::plot::{data_range, draw_colorbar, draw_heatmap, draw_legend, draw_masked_line, draw_mesh, is_finite_point, render_svg};

pub const FILE_NAME: &str = "figure1.svg";

pub const START_POSITIONS: [f64; 6] = [-2.0, -1.5, -1.0, 1.0, 1.5, 2.0];
pub const LAMBDA0: f64 = 10.0;
const HEATMAP_LEVELS: usize = 40;

#[derive(Debug, Clone)]
pub struct FixedPointDynamics {
    pub tau: Vec<f64>,
    /// `(x0, x(τ))` per starting position.
    pub geodesics: Vec<(f64, Vec<f64>)>,
    pub suppression: Field2d,
}

pub fn compute(grid: usize) -> Result<FixedPointDynamics, AppError> {
    let tau = linspace(0.0, 5.0, 100);
    let geodesics = START_POSITIONS
        .iter()
        .map(|&x0| {
            let states = integrate(geodesic_rhs(LAMBDA0), Vector2::new(x0, 0.0), &tau, OdeOptions::default())?;
            Ok((x0, states.iter().map(|s| s[0]).collect()))
        })
        .collect::<Result<Vec<_>, AppError>>()?;

    let x = linspace(-3.0, 3.0, grid);
    let t = linspace(-3.0, 3.0, grid);
    let z = meshgrid(&x, &t, metric_suppression);
    let suppression = Field2d {
        label: "h_tt".to_string(),
        x,
        y: t,
        z,
    };
    Ok(FixedPointDynamics { tau, geodesics, suppression })
}

impl FixedPointDynamics {
    pub fn figure_data(&self) -> FigureData {
        let mut data = FigureData::new(FigureKind::FixedPoint);
        for (x0, xs) in &self.geodesics {
            data.series.push(Series::new(format!("geodesic_x0_{x0}"), self.tau.clone(), xs.clone()));
        }
        data.fields.push(self.suppression.clone());
        data
    }
}

pub fn render(d: &FixedPointDynamics, path: &Path) -> Result<(), AppError> {
    let x_range = data_range(d.geodesics.iter().flat_map(|(_, xs)| xs.iter()), 0.05).unwrap_or(-2.2..2.2);
    let z_range = d.suppression.z_range().unwrap_or((0.0, 1.0));
    let colors = viridis_steps(d.geodesics.len());

    render_svg(path, (1500, 600), |root| {
        let root = root.titled("Fixed Point Dynamics", caption_font())?;
        let (w, _) = root.dim_in_pixel();
        let (left, right) = root.split_horizontally(w as i32 / 2);

        let mut a = ChartBuilder::on(&left)
            .caption("(a) Geodesic Convergence", label_font())
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d(0.0..5.0, x_range.clone())?;
        draw_mesh(&mut a, "Proper time τ", "Spatial coordinate x")?;
        for ((_, xs), color) in d.geodesics.iter().zip(colors.iter()) {
            draw_masked_line(
                &mut a,
                d.tau.iter().copied().zip(xs.iter().copied()),
                is_finite_point,
                color.mix(0.8).stroke_width(2),
                None,
            )?;
        }
        a.draw_series(std::iter::once(TriangleMarker::new((5.0, 0.0), 8, RED_C.filled())))?
            .label("Fixed point P")
            .legend(|(x, y)| TriangleMarker::new((x + 10, y), 6, RED_C.filled()));
        draw_legend(&mut a)?;

        let (rw, _) = right.dim_in_pixel();
        let (panel, bar) = right.split_horizontally(rw as i32 - 110);
        let mut b = ChartBuilder::on(&panel)
            .caption("(b) Metric Suppression", label_font())
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d(-3.0..3.0, -3.0..3.0)?;
        draw_heatmap(&mut b, &d.suppression, z_range, HEATMAP_LEVELS, false)?;
        draw_mesh(&mut b, "Spatial coordinate x", "Time coordinate t")?;
        b.draw_series(std::iter::once(TriangleMarker::new((0.0, 0.0), 8, RED_C.filled())))?;
        draw_colorbar(&bar, z_range, HEATMAP_LEVELS, "h_tt")?;
        Ok(())
    })
}

pub fn run(cfg: &FigureConfig) -> Result<FigureOutput, AppError> {
    let d = compute(100)?;
    let path = cfg.out_dir.join(FILE_NAME);
    render(&d, &path)?;
    Ok(FigureOutput {
        figure: FigureKind::FixedPoint,
        images: vec![path],
        data: d.figure_data(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figures::test_support::scratch_dir;

    #[test]
    fn mirrored_starts_give_mirrored_geodesics() {
        let d = compute(20).unwrap();
        assert_eq!(d.geodesics.len(), 6);
        let (_, left) = &d.geodesics[0];
        let (_, right) = &d.geodesics[5];
        for (l, r) in left.iter().zip(right.iter()) {
            assert!((l + r).abs() < 1e-9);
        }
        assert_eq!(left[0], -2.0);
    }

    #[test]
    fn suppression_grid_vanishes_only_at_the_centre() {
        let d = compute(21).unwrap();
        assert!(d.suppression.z[10][10].abs() < 1e-12);
        let (lo, hi) = d.suppression.z_range().unwrap();
        assert!(lo >= 0.0);
        assert!(hi > 0.0 && hi < 0.5);
    }

    #[test]
    fn renders_with_defaults() {
        let dir = scratch_dir("fixed-point");
        let out = run(&FigureConfig {
            out_dir: dir.clone(),
            ..FigureConfig::default()
        })
        .unwrap();
        assert_eq!(out.data.fields.len(), 1);
        assert!(std::fs::metadata(&out.images[0]).unwrap().len() > 0);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
