//! Weak-scaling benchmark of the spectral solver against `N² log N`.

use std::path::Path;

use plotters::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::domain::{FigureConfig, FigureData, FigureKind, FigureOutput, Series};
use crate::error::AppError;
use crate::math::log_space;
use crate::models::{BENCHMARK_SIZES, SCALING_PREFACTOR, jittered_runtimes, theoretical_scaling};
use crate::plot::style::{BLUE_C, FIGURE_SIZE, RED_C, caption_font};
use crate::plot::{draw_dashed, draw_legend, draw_masked_line, draw_mesh, render_svg, within};

pub const FILE_NAME: &str = "scaling_benchmark.svg";

const N_MIN: f64 = 10.0;
const N_MAX: f64 = 1000.0;

#[derive(Debug, Clone)]
pub struct ScalingBenchmark {
    pub n_theory: Vec<f64>,
    pub t_theory: Vec<f64>,
    pub n_actual: Vec<f64>,
    pub t_actual: Vec<f64>,
}

pub fn compute(seed: u64) -> Result<ScalingBenchmark, AppError> {
    let n_theory = log_space(N_MIN, N_MAX, 100)?;
    let t_theory = n_theory
        .iter()
        .map(|&n| theoretical_scaling(n, SCALING_PREFACTOR))
        .collect();
    let mut rng = StdRng::seed_from_u64(seed);
    let t_actual = jittered_runtimes(&BENCHMARK_SIZES, SCALING_PREFACTOR, &mut rng);
    Ok(ScalingBenchmark {
        n_theory,
        t_theory,
        n_actual: BENCHMARK_SIZES.to_vec(),
        t_actual,
    })
}

impl ScalingBenchmark {
    pub fn figure_data(&self) -> FigureData {
        let mut data = FigureData::new(FigureKind::Scaling);
        data.series.push(Series::new("theoretical", self.n_theory.clone(), self.t_theory.clone()));
        data.series.push(Series::new("actual", self.n_actual.clone(), self.t_actual.clone()));
        data
    }
}

pub fn render(b: &ScalingBenchmark, path: &Path) -> Result<(), AppError> {
    let t_min = theoretical_scaling(N_MIN, SCALING_PREFACTOR) * 0.5;
    let t_max = theoretical_scaling(N_MAX, SCALING_PREFACTOR) * 2.0;

    render_svg(path, FIGURE_SIZE, |root| {
        let mut chart = ChartBuilder::on(root)
            .caption("Weak Scaling of FPIT Spectral Solver", caption_font())
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(70)
            .build_cartesian_2d((N_MIN..N_MAX).log_scale(), (t_min..t_max).log_scale())?;
        draw_mesh(&mut chart, "Grid size N (N×N)", "Runtime (s)")?;

        draw_dashed(
            &mut chart,
            b.n_theory.iter().copied().zip(b.t_theory.iter().copied()).collect(),
            RED_C.stroke_width(2),
            Some("Theoretical N² log N"),
        )?;

        let actual: Vec<(f64, f64)> = b.n_actual.iter().copied().zip(b.t_actual.iter().copied()).collect();
        draw_masked_line(
            &mut chart,
            actual.iter().copied(),
            within(t_min..t_max),
            BLUE_C.stroke_width(2),
            Some("Actual runtimes"),
        )?;
        chart.draw_series(actual.iter().map(|&p| Circle::new(p, 5, BLUE_C.filled())))?;

        draw_legend(&mut chart)?;
        Ok(())
    })
}

pub fn run(cfg: &FigureConfig) -> Result<FigureOutput, AppError> {
    let bench = compute(cfg.seed)?;
    let path = cfg.out_dir.join(FILE_NAME);
    render(&bench, &path)?;
    Ok(FigureOutput {
        figure: FigureKind::Scaling,
        images: vec![path],
        data: bench.figure_data(),
    })
}
