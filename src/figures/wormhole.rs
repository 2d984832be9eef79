//! Wormhole dynamics: exotic matter support and the radial metric component.

use std::path::Path;

use plotters::prelude::*;

use crate::domain::{FigureConfig, FigureData, FigureKind, FigureOutput, Series};
use crate::error::AppError;
use crate::math::linspace;
use crate::models::{exotic_matter_profile, wormhole_grr};
use crate::plot::style::{caption_font, label_font};
use crate::plot::{data_range, draw_dashed, draw_legend_at, draw_masked_line, draw_mesh, is_finite_point, render_svg, within};

pub const FILE_NAME: &str = "figure2.svg";

pub const THROAT_RADIUS: f64 = 1.0;
const GRR_MAX: f64 = 10.0;

const CRIMSON: RGBColor = RGBColor(220, 20, 60);
const NAVY: RGBColor = RGBColor(0, 0, 128);
const DARK_ORANGE: RGBColor = RGBColor(255, 140, 0);

#[derive(Debug, Clone)]
pub struct WormholeProfiles {
    pub r_matter: Vec<f64>,
    pub rho: Vec<f64>,
    pub r_metric: Vec<f64>,
    pub g_rr: Vec<f64>,
}

/// Samples `g_rr` strictly outside the throat, from `b0 + 0.01` outward.
pub fn compute(b0: f64) -> Result<WormholeProfiles, AppError> {
    let r_matter = linspace(0.1, 5.0, 100);
    let rho = r_matter.iter().map(|&r| exotic_matter_profile(r)).collect();

    let r_metric = linspace(b0 + 0.01, 5.0, 100);
    let g_rr = r_metric
        .iter()
        .map(|&r| {
            wormhole_grr(r, b0).ok_or_else(|| AppError::numerical(format!("g_rr undefined at r={r} (b0={b0}).")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(WormholeProfiles { r_matter, rho, r_metric, g_rr })
}

impl WormholeProfiles {
    pub fn figure_data(&self) -> FigureData {
        let mut data = FigureData::new(FigureKind::Wormhole);
        data.series.push(Series::new("rho_exotic", self.r_matter.clone(), self.rho.clone()));
        data.series.push(Series::new("g_rr", self.r_metric.clone(), self.g_rr.clone()));
        data
    }
}

pub fn render(p: &WormholeProfiles, b0: f64, path: &Path) -> Result<(), AppError> {
    let rho_range = data_range(p.rho.iter().chain(std::iter::once(&0.0)), 0.08).unwrap_or(-0.05..0.01);

    render_svg(path, (1500, 600), |root| {
        let root = root.titled("Wormhole Dynamics", caption_font())?;
        let (w, _) = root.dim_in_pixel();
        let (left, right) = root.split_horizontally(w as i32 / 2);

        let mut a = ChartBuilder::on(&left)
            .caption("(a) Exotic Matter Profile", label_font())
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(80)
            .build_cartesian_2d(0.0..5.0, rho_range.clone())?;
        draw_mesh(&mut a, "Radial coordinate r", "ρ_exotic")?;
        // Area between the profile and zero.
        let mut area: Vec<(f64, f64)> = p.r_matter.iter().copied().zip(p.rho.iter().copied()).collect();
        let ends = (area.first().map(|pt| pt.0), area.last().map(|pt| pt.0));
        if let (Some(r0), Some(r1)) = ends {
            area.push((r1, 0.0));
            area.push((r0, 0.0));
        }
        a.draw_series(std::iter::once(Polygon::new(area, CRIMSON.mix(0.2).filled())))?;
        draw_masked_line(
            &mut a,
            p.r_matter.iter().copied().zip(p.rho.iter().copied()),
            is_finite_point,
            CRIMSON.stroke_width(2),
            None,
        )?;
        draw_dashed(&mut a, vec![(0.0, 0.0), (5.0, 0.0)], BLACK.stroke_width(1), None)?;

        let mut b = ChartBuilder::on(&right)
            .caption("(b) Metric Component", label_font())
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d(0.0..5.0, 0.0..GRR_MAX)?;
        draw_mesh(&mut b, "Radial coordinate r", "g_rr(r)")?;
        draw_masked_line(
            &mut b,
            p.r_metric.iter().copied().zip(p.g_rr.iter().copied()),
            within(0.0..GRR_MAX),
            NAVY.stroke_width(2),
            None,
        )?;
        draw_dashed(
            &mut b,
            vec![(b0, 0.0), (b0, GRR_MAX)],
            DARK_ORANGE.stroke_width(2),
            Some("Throat r = b0"),
        )?;
        draw_legend_at(&mut b, SeriesLabelPosition::UpperLeft)?;
        Ok(())
    })
}

pub fn run(cfg: &FigureConfig) -> Result<FigureOutput, AppError> {
    let profiles = compute(THROAT_RADIUS)?;
    let path = cfg.out_dir.join(FILE_NAME);
    render(&profiles, THROAT_RADIUS, &path)?;
    Ok(FigureOutput {
        figure: FigureKind::Wormhole,
        images: vec![path],
        data: profiles.figure_data(),
    })
}
