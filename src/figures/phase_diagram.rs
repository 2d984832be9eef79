//! Exotic matter phase diagrams, one heatmap per self-interaction potential.

use std::path::{Path, PathBuf};

use plotters::prelude::*;
use rayon::prelude::*;

use crate::domain::{FigureConfig, FigureData, FigureKind, FigureOutput, Field2d};
use crate::error::AppError;
use crate::math::{linspace, log_space};
use crate::models::{Potential, phase_diagram};
use crate::plot::style::caption_font;
use crate::plot::{draw_colorbar, draw_heatmap, draw_mesh, render_svg};

pub const CONTOUR_LEVELS: usize = 50;

#[derive(Debug, Clone)]
pub struct PhaseDiagramParams {
    pub phi_min: f64,
    pub phi_max: f64,
    pub phi_points: usize,
    pub lambda_min: f64,
    pub lambda_max: f64,
    pub lambda_points: usize,
    pub sigma: f64,
}

impl Default for PhaseDiagramParams {
    fn default() -> Self {
        Self {
            phi_min: -3.0,
            phi_max: 3.0,
            phi_points: 500,
            lambda_min: 0.1,
            lambda_max: 100.0,
            lambda_points: 100,
            sigma: 1.0,
        }
    }
}

pub fn file_name(potential: Potential) -> String {
    format!("exotic_matter_phase_diagram_{}.svg", potential.slug())
}

/// `T_exotic(φ, λ)` for every potential, in [`Potential::ALL`] order.
pub fn compute(p: &PhaseDiagramParams) -> Result<Vec<(Potential, Field2d)>, AppError> {
    let phi = linspace(p.phi_min, p.phi_max, p.phi_points);
    let lambdas = log_space(p.lambda_min, p.lambda_max, p.lambda_points)?;

    Ok(Potential::ALL
        .par_iter()
        .map(|&potential| {
            let z = phase_diagram(potential, &phi, &lambdas, p.sigma);
            let field = Field2d {
                label: format!("T_exotic ({})", potential.display_name()),
                x: phi.clone(),
                y: lambdas.clone(),
                z,
            };
            (potential, field)
        })
        .collect())
}

pub fn render(potential: Potential, field: &Field2d, path: &Path) -> Result<(), AppError> {
    let z_range = field.z_range().unwrap_or((0.0, 1.0));
    let x_range = field.x.first().copied().unwrap_or(-3.0)..field.x.last().copied().unwrap_or(3.0);
    let y_range = field.y.first().copied().unwrap_or(0.1)..field.y.last().copied().unwrap_or(100.0);

    render_svg(path, (1000, 750), |root| {
        let (w, _) = root.dim_in_pixel();
        let (main, bar) = root.split_horizontally(w as i32 - 120);

        let mut chart = ChartBuilder::on(&main)
            .caption(
                format!("Exotic Matter Phase Diagram: {} Potential", potential.display_name()),
                caption_font(),
            )
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(70)
            .build_cartesian_2d(x_range.clone(), y_range.clone().log_scale())?;
        draw_heatmap(&mut chart, field, z_range, CONTOUR_LEVELS, true)?;
        draw_mesh(&mut chart, "Field value φ", "Constraint strength λ")?;

        draw_colorbar(&bar, z_range, CONTOUR_LEVELS, "T_exotic")?;
        Ok(())
    })
}

pub fn run(cfg: &FigureConfig) -> Result<FigureOutput, AppError> {
    let diagrams = compute(&PhaseDiagramParams::default())?;

    let mut images: Vec<PathBuf> = Vec::with_capacity(diagrams.len());
    let mut data = FigureData::new(FigureKind::PhaseDiagram);
    for (potential, field) in diagrams {
        let path = cfg.out_dir.join(file_name(potential));
        render(potential, &field, &path)?;
        if let Some((lo, hi)) = field.z_range() {
            data.scalars.push((format!("{}_t_min", potential.slug()), lo));
            data.scalars.push((format!("{}_t_max", potential.slug()), hi));
        }
        images.push(path);
        data.fields.push(field);
    }

    Ok(FigureOutput {
        figure: FigureKind::PhaseDiagram,
        images,
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figures::test_support::scratch_dir;

    #[test]
    fn one_field_per_potential_on_log_lambda_grid() {
        let p = PhaseDiagramParams {
            phi_points: 41,
            lambda_points: 9,
            ..PhaseDiagramParams::default()
        };
        let diagrams = compute(&p).unwrap();
        assert_eq!(diagrams.len(), 3);
        for (potential, field) in &diagrams {
            assert_eq!(field.z.len(), 9);
            assert!(field.z.iter().all(|row| row.len() == 41));
            assert!((field.y[0] - 0.1).abs() < 1e-12);
            assert!((field.y[8] - 100.0).abs() < 1e-9);
            assert!(field.label.contains(potential.display_name()));
        }
    }

    #[test]
    fn renders_three_files() {
        let dir = scratch_dir("phase-diagram");
        let out = run(&FigureConfig {
            out_dir: dir.clone(),
            ..FigureConfig::default()
        })
        .unwrap();
        assert_eq!(out.images.len(), 3);
        assert!(out.images[1].ends_with("exotic_matter_phase_diagram_quartic.svg"));
        for img in &out.images {
            assert!(std::fs::metadata(img).unwrap().len() > 0);
        }
        let _ = std::fs::remove_dir_all(&dir);
    }
}
