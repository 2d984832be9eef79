//! Metric rigidity phase diagram from Monte-Carlo trials.

use std::path::Path;

use plotters::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};
use rayon::prelude::*;
use tracing::debug;

use crate::domain::{FigureConfig, FigureData, FigureKind, FigureOutput, Series};
use crate::error::AppError;
use crate::math::linspace;
use crate::models::{RigidityRegime, rigidity_perturbation};
use crate::plot::style::{BLUE_C, FIGURE_SIZE, ORANGE_C, RED_C, caption_font};
use crate::plot::{draw_dashed, draw_legend, draw_masked_line, draw_mesh, render_svg, segments, within};

pub const FILE_NAME: &str = "metric_rigidity.svg";

const Y_MIN: f64 = 1e-5;
const Y_MAX: f64 = 0.2;

#[derive(Debug, Clone)]
pub struct RigidityParams {
    pub lambda_min: f64,
    pub lambda_max: f64,
    pub points: usize,
    pub trials: usize,
}

impl Default for RigidityParams {
    fn default() -> Self {
        Self {
            lambda_min: 0.5,
            lambda_max: 2.5,
            points: 500,
            trials: 1000,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RigidityStats {
    pub lambdas: Vec<f64>,
    pub mean: Vec<f64>,
    pub std: Vec<f64>,
}

impl RigidityStats {
    pub fn lower(&self) -> Vec<f64> {
        self.mean.iter().zip(self.std.iter()).map(|(m, s)| m - 2.0 * s).collect()
    }

    pub fn upper(&self) -> Vec<f64> {
        self.mean.iter().zip(self.std.iter()).map(|(m, s)| m + 2.0 * s).collect()
    }

    pub fn figure_data(&self) -> FigureData {
        let mut data = FigureData::new(FigureKind::MetricRigidity);
        data.series.push(Series::new("mean_delta_h", self.lambdas.clone(), self.mean.clone()));
        data.series.push(Series::new("ci_lower", self.lambdas.clone(), self.lower()));
        data.series.push(Series::new("ci_upper", self.lambdas.clone(), self.upper()));
        data
    }
}

fn trial_seed(seed: u64, trial: usize) -> u64 {
    seed.wrapping_mul(0x9E37_79B9_7F4A_7C15).wrapping_add(trial as u64 + 1)
}

/// Base perturbation plus measurement noise, then `trials` re-noised copies.
///
/// Every trial draws from its own seeded stream, so the parallel result is
/// identical to a sequential run.
pub fn compute(p: &RigidityParams, seed: u64) -> Result<RigidityStats, AppError> {
    if p.trials < 2 || p.points == 0 {
        return Err(AppError::invalid("Need at least 2 trials and 1 λ sample."));
    }
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| AppError::numerical(format!("Noise distribution error: {e}")))?;

    let lambdas = linspace(p.lambda_min, p.lambda_max, p.points);
    let noise: Vec<f64> = lambdas
        .iter()
        .map(|&l| RigidityRegime::classify(l).noise_level())
        .collect();

    let mut rng = StdRng::seed_from_u64(seed);
    let base: Vec<f64> = lambdas
        .iter()
        .zip(noise.iter())
        .map(|(&l, &sigma)| {
            let z: f64 = normal.sample(&mut rng);
            rigidity_perturbation(l, &mut rng) + sigma * z
        })
        .collect();

    let trials: Vec<Vec<f64>> = (0..p.trials)
        .into_par_iter()
        .map(|trial| {
            let mut rng = StdRng::seed_from_u64(trial_seed(seed, trial));
            base.iter()
                .zip(noise.iter())
                .map(|(&b, &sigma)| b + sigma * normal.sample(&mut rng))
                .collect()
        })
        .collect();

    let n = p.trials as f64;
    let mut mean = vec![0.0; p.points];
    for t in &trials {
        for (m, v) in mean.iter_mut().zip(t.iter()) {
            *m += v / n;
        }
    }
    // Population standard deviation across trials.
    let mut var = vec![0.0; p.points];
    for t in &trials {
        for ((acc, v), m) in var.iter_mut().zip(t.iter()).zip(mean.iter()) {
            *acc += (v - m).powi(2) / n;
        }
    }
    let std = var.into_iter().map(f64::sqrt).collect();
    debug!(points = p.points, trials = p.trials, "Rigidity trials aggregated");

    Ok(RigidityStats { lambdas, mean, std })
}

pub fn render(stats: &RigidityStats, path: &Path) -> Result<(), AppError> {
    let x_range = stats.lambdas.first().copied().unwrap_or(0.5)..stats.lambdas.last().copied().unwrap_or(2.5);
    let (lower, upper) = (stats.lower(), stats.upper());

    render_svg(path, FIGURE_SIZE, |root| {
        let mut chart = ChartBuilder::on(root)
            .caption("Metric Rigidity Phase Diagram", caption_font())
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(80)
            .build_cartesian_2d(x_range.clone(), (Y_MIN..Y_MAX).log_scale())?;
        draw_mesh(&mut chart, "Coupling strength λ", "Metric perturbation Δh_tt")?;

        // A log axis cannot show the band where it dips to or below zero;
        // clamp each edge into the window and split the band where the mean
        // itself leaves it.
        let keep = within(Y_MIN..Y_MAX);
        let band_points = stats
            .lambdas
            .iter()
            .zip(stats.mean.iter())
            .enumerate()
            .map(|(i, (&x, &m))| (i as f64, if keep(x, m) { m } else { f64::NAN }));
        let band_color = RGBColor(171, 217, 233);
        let mut labelled = false;
        for run in segments(band_points, |_, m| m.is_finite()) {
            let idx: Vec<usize> = run.iter().map(|&(i, _)| i as usize).collect();
            let mut poly: Vec<(f64, f64)> = idx
                .iter()
                .map(|&i| (stats.lambdas[i], upper[i].clamp(Y_MIN, Y_MAX)))
                .collect();
            poly.extend(idx.iter().rev().map(|&i| (stats.lambdas[i], lower[i].clamp(Y_MIN, Y_MAX))));
            let anno = chart.draw_series(std::iter::once(Polygon::new(poly, band_color.mix(0.5).filled())))?;
            if !labelled {
                anno.label("95% CI").legend(move |(x, y)| {
                    Rectangle::new([(x, y - 4), (x + 20, y + 4)], band_color.mix(0.5).filled())
                });
                labelled = true;
            }
        }

        draw_masked_line(
            &mut chart,
            stats.lambdas.iter().copied().zip(stats.mean.iter().copied()),
            within(Y_MIN..Y_MAX),
            BLUE_C.stroke_width(2),
            Some("Mean Δh_tt"),
        )?;
        draw_dashed(
            &mut chart,
            vec![(1.0, Y_MIN), (1.0, Y_MAX)],
            RED_C.stroke_width(2),
            Some("Critical phase (λ = 1)"),
        )?;
        draw_dashed(
            &mut chart,
            vec![(1.5, Y_MIN), (1.5, Y_MAX)],
            ORANGE_C.stroke_width(2),
            Some("Topological locking (λ = 1.5)"),
        )?;
        draw_legend(&mut chart)?;
        Ok(())
    })
}

pub fn run(cfg: &FigureConfig) -> Result<FigureOutput, AppError> {
    let stats = compute(&RigidityParams::default(), cfg.seed)?;
    let path = cfg.out_dir.join(FILE_NAME);
    render(&stats, &path)?;
    Ok(FigureOutput {
        figure: FigureKind::MetricRigidity,
        images: vec![path],
        data: stats.figure_data(),
    })
}
