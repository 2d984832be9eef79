//! ANEC violation profile of the Gaussian constraint field.

use std::path::Path;

use plotters::prelude::*;

use crate::domain::{FigureConfig, FigureData, FigureKind, FigureOutput, Series};
use crate::error::AppError;
use crate::math::{cumulative_sum_integral, linspace, spacing};
use crate::models::anec_energy_density;
use crate::plot::style::caption_font;
use crate::plot::{data_range, draw_dashed, draw_legend, draw_masked_line, draw_mesh, is_finite_point, render_svg};

pub const FILE_NAME: &str = "anec_proof.svg";

#[derive(Debug, Clone)]
pub struct AnecParams {
    pub phi0: f64,
    pub sigma: f64,
    pub lambda: f64,
    pub points: usize,
}

impl Default for AnecParams {
    fn default() -> Self {
        Self {
            phi0: 1.0,
            sigma: 1.0,
            lambda: 1.5,
            points: 1000,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnecProfile {
    /// Radius in units of `σ`.
    pub r_over_sigma: Vec<f64>,
    pub rho: Vec<f64>,
    /// Running `Σ ρ · Δr`.
    pub integral: Vec<f64>,
}

pub fn compute(p: &AnecParams) -> AnecProfile {
    let r = linspace(0.0, 5.0 * p.sigma, p.points);
    let rho: Vec<f64> = r
        .iter()
        .map(|&ri| anec_energy_density(ri, p.phi0, p.sigma, p.lambda))
        .collect();
    let integral = cumulative_sum_integral(&rho, spacing(&r));
    AnecProfile {
        r_over_sigma: r.iter().map(|ri| ri / p.sigma).collect(),
        rho,
        integral,
    }
}

impl AnecProfile {
    pub fn figure_data(&self) -> FigureData {
        let mut data = FigureData::new(FigureKind::Anec);
        data.series.push(Series::new("rho_exotic", self.r_over_sigma.clone(), self.rho.clone()));
        data.series.push(Series::new("cumulative_integral", self.r_over_sigma.clone(), self.integral.clone()));
        if let Some(&total) = self.integral.last() {
            data.scalars.push(("integral_total".to_string(), total));
        }
        data
    }
}

pub fn render(profile: &AnecProfile, path: &Path) -> Result<(), AppError> {
    let x_range = data_range(&profile.r_over_sigma, 0.0).unwrap_or(0.0..5.0);
    let rho_range = data_range(&profile.rho, 0.08).unwrap_or(-1.0..1.0);
    let int_range = data_range(profile.integral.iter().chain(std::iter::once(&0.0)), 0.08).unwrap_or(-1.0..1.0);

    render_svg(path, (800, 600), |root| {
        let (upper, lower) = root.split_vertically(300);

        let mut top = ChartBuilder::on(&upper)
            .caption("ANEC Violation Proof: Actual Field Configuration", caption_font())
            .margin(10)
            .x_label_area_size(25)
            .y_label_area_size(70)
            .build_cartesian_2d(x_range.clone(), rho_range.clone())?;
        draw_mesh(&mut top, "", "ρ [Planck units]")?;
        draw_masked_line(
            &mut top,
            profile.r_over_sigma.iter().copied().zip(profile.rho.iter().copied()),
            is_finite_point,
            RED.stroke_width(2),
            Some("ρ_exotic(r)"),
        )?;
        draw_dashed(
            &mut top,
            vec![(1.0, rho_range.start), (1.0, rho_range.end)],
            BLACK.stroke_width(1),
            Some("Throat radius b0"),
        )?;
        draw_legend(&mut top)?;

        let mut bottom = ChartBuilder::on(&lower)
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(70)
            .build_cartesian_2d(x_range.clone(), int_range.clone())?;
        draw_mesh(&mut bottom, "r/σ", "∫ρ dr")?;
        draw_masked_line(
            &mut bottom,
            profile.r_over_sigma.iter().copied().zip(profile.integral.iter().copied()),
            is_finite_point,
            BLUE.stroke_width(2),
            None,
        )?;
        draw_dashed(
            &mut bottom,
            vec![(x_range.start, 0.0), (x_range.end, 0.0)],
            BLACK.stroke_width(1),
            None,
        )?;
        Ok(())
    })
}

pub fn run(cfg: &FigureConfig) -> Result<FigureOutput, AppError> {
    let profile = compute(&AnecParams::default());
    let path = cfg.out_dir.join(FILE_NAME);
    render(&profile, &path)?;
    Ok(FigureOutput {
        figure: FigureKind::Anec,
        images: vec![path],
        data: profile.figure_data(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figures::test_support::scratch_dir;

    #[test]
    fn profile_covers_five_widths() {
        let p = AnecParams::default();
        let profile = compute(&p);
        assert_eq!(profile.rho.len(), p.points);
        assert_eq!(profile.r_over_sigma[0], 0.0);
        assert!((profile.r_over_sigma[p.points - 1] - 5.0).abs() < 1e-12);
        // Far tail contributes nothing more to the running integral.
        let n = profile.integral.len();
        assert!((profile.integral[n - 1] - profile.integral[n - 2]).abs() < 1e-8);
    }

    #[test]
    fn renders_with_defaults() {
        let dir = scratch_dir("anec");
        let out = run(&FigureConfig {
            out_dir: dir.clone(),
            ..FigureConfig::default()
        })
        .unwrap();
        assert!(std::fs::metadata(&out.images[0]).unwrap().len() > 0);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
