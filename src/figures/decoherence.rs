//! Decoherence vs constraint strength: data, fit and residual panels.

use std::path::Path;

use plotters::prelude::*;
use tracing::info;

use crate::decoherence::{DecoherenceSweep, run_sweep, select_provider};
use crate::domain::{DecoherenceConfig, FigureConfig, FigureData, FigureKind, FigureOutput, Series};
use crate::error::AppError;
use crate::plot::style::{GREY_C, caption_font};
use crate::plot::{band_polygon, draw_dashed, draw_legend, draw_masked_line, draw_mesh, is_finite_point, render_svg, within};

pub const FILE_NAME: &str = "decoherence_vs_lambda.svg";

const RESIDUAL_BAND: f64 = 0.1;
const RESIDUAL_LIMIT: f64 = 0.15;

/// Simulated values with failed samples as `NaN`.
fn with_gaps(values: &[Option<f64>]) -> Vec<f64> {
    values.iter().map(|v| v.unwrap_or(f64::NAN)).collect()
}

pub fn figure_data(sweep: &DecoherenceSweep, cfg: &DecoherenceConfig) -> FigureData {
    let mut data = FigureData::new(FigureKind::Decoherence);
    data.series.push(Series::new("synthetic", sweep.lambdas.clone(), sweep.synthetic.clone()));
    if let Some(sim) = &sweep.simulated {
        data.series.push(Series::new("lindblad", sweep.lambdas.clone(), with_gaps(sim)));
    }
    data.series.push(Series::new("fit", sweep.lambdas.clone(), sweep.fitted.clone()));
    data.series.push(Series::new(
        "residual_synthetic",
        sweep.lambdas.clone(),
        sweep.synthetic_residuals.clone(),
    ));
    if let Some(res) = &sweep.simulated_residuals {
        data.series.push(Series::new("residual_lindblad", sweep.lambdas.clone(), with_gaps(res)));
    }

    data.scalars.push(("lambda0_fit".to_string(), sweep.lambda0()));
    data.scalars.push(("p0_fit".to_string(), sweep.p0()));
    if let Some(se) = sweep.fit.std_errors() {
        data.scalars.push(("lambda0_std_error".to_string(), se[0]));
        data.scalars.push(("p0_std_error".to_string(), se[1]));
    }
    data.scalars.push(("rmse".to_string(), sweep.fit.rmse));
    data.scalars.push(("failed_samples".to_string(), sweep.failed_samples() as f64));
    data.scalars.push(("lambda_crit".to_string(), cfg.lambda_crit));
    data
}

/// Log-y range covering every positive value drawn in the top panel.
fn probability_range(sweep: &DecoherenceSweep) -> std::ops::Range<f64> {
    let sim = sweep.simulated.iter().flatten().flatten();
    let (lo, hi) = sweep
        .synthetic
        .iter()
        .chain(sweep.fitted.iter())
        .chain(sim)
        .copied()
        .filter(|v| v.is_finite() && *v > 0.0)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if lo > hi {
        return 1e-2..1.0;
    }
    (lo * 0.8)..(hi * 1.25)
}

pub fn render(sweep: &DecoherenceSweep, cfg: &DecoherenceConfig, path: &Path) -> Result<(), AppError> {
    let x_range = cfg.lambda_min..cfg.lambda_max;
    let y_range = probability_range(sweep);

    render_svg(path, (800, 800), |root| {
        let (upper, lower) = root.split_vertically(600);

        let mut top = ChartBuilder::on(&upper)
            .caption("Decoherence vs Constraint Strength", caption_font())
            .margin(15)
            .x_label_area_size(30)
            .y_label_area_size(70)
            .build_cartesian_2d(x_range.clone(), y_range.clone().log_scale())?;
        draw_mesh(&mut top, "", "Branching probability P")?;

        let visible = within(y_range.clone());
        top.draw_series(
            sweep
                .lambdas
                .iter()
                .zip(sweep.synthetic.iter())
                .filter(|&(&x, &y)| visible(x, y))
                .map(|(&x, &y)| Circle::new((x, y), 3, BLACK.mix(0.7).filled())),
        )?
        .label("Synthetic data")
        .legend(|(x, y)| Circle::new((x + 10, y), 3, BLACK.filled()));

        if let Some(sim) = &sweep.simulated {
            top.draw_series(
                sweep
                    .lambdas
                    .iter()
                    .zip(sim.iter())
                    .filter_map(|(&x, v)| v.map(|y| (x, y)))
                    .filter(|&(x, y)| visible(x, y))
                    .map(|p| TriangleMarker::new(p, 5, BLUE.mix(0.7).filled())),
            )?
            .label("Lindblad simulation")
            .legend(|(x, y)| TriangleMarker::new((x + 10, y), 5, BLUE.filled()));
        }

        let theory_label = format!("Theory: P = exp(-λ/{:.2})", sweep.lambda0());
        draw_masked_line(
            &mut top,
            sweep.lambdas.iter().copied().zip(sweep.fitted.iter().copied()),
            within(y_range.clone()),
            RED.stroke_width(2),
            Some(theory_label.as_str()),
        )?;
        draw_dashed(
            &mut top,
            vec![(cfg.lambda_crit, y_range.start), (cfg.lambda_crit, y_range.end)],
            GREY_C.stroke_width(1),
            Some("Critical λ_crit"),
        )?;
        draw_legend(&mut top)?;

        let mut bottom = ChartBuilder::on(&lower)
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(70)
            .build_cartesian_2d(x_range.clone(), -RESIDUAL_LIMIT..RESIDUAL_LIMIT)?;
        draw_mesh(&mut bottom, "Constraint strength λ", "Residuals")?;

        let band = band_polygon(
            &[x_range.start, x_range.end],
            &[-RESIDUAL_BAND, -RESIDUAL_BAND],
            &[RESIDUAL_BAND, RESIDUAL_BAND],
        );
        bottom
            .draw_series(std::iter::once(Polygon::new(band, GREY_C.mix(0.2).filled())))?
            .label("±10% band")
            .legend(|(x, y)| Rectangle::new([(x, y - 4), (x + 20, y + 4)], GREY_C.mix(0.2).filled()));
        bottom.draw_series(LineSeries::new(
            vec![(x_range.start, 0.0), (x_range.end, 0.0)],
            RED.stroke_width(1),
        ))?;

        let in_panel = within(-RESIDUAL_LIMIT..RESIDUAL_LIMIT);
        bottom.draw_series(
            sweep
                .lambdas
                .iter()
                .zip(sweep.synthetic_residuals.iter())
                .filter(|&(&x, &y)| in_panel(x, y))
                .map(|(&x, &y)| Circle::new((x, y), 2, BLACK.mix(0.7).filled())),
        )?;
        if let Some(res) = &sweep.simulated_residuals {
            bottom
                .draw_series(
                    sweep
                        .lambdas
                        .iter()
                        .zip(res.iter())
                        .filter_map(|(&x, v)| v.map(|y| (x, y)))
                        .filter(|&(x, y)| is_finite_point(x, y) && in_panel(x, y))
                        .map(|p| TriangleMarker::new(p, 4, BLUE.mix(0.7).filled())),
                )?
                .label("Lindblad residuals")
                .legend(|(x, y)| TriangleMarker::new((x + 10, y), 4, BLUE.filled()));
        }
        draw_legend(&mut bottom)?;
        Ok(())
    })
}

pub fn run(cfg: &FigureConfig, deco: &DecoherenceConfig) -> Result<FigureOutput, AppError> {
    let provider = select_provider(deco.simulation)?;
    let sweep = run_sweep(deco, cfg.seed, provider.as_ref())?;
    info!(
        provider = sweep.provider,
        lambda0 = sweep.lambda0(),
        p0 = sweep.p0(),
        failed = sweep.failed_samples(),
        "Decoherence sweep fitted"
    );

    let path = cfg.out_dir.join(FILE_NAME);
    render(&sweep, deco, &path)?;

    Ok(FigureOutput {
        figure: FigureKind::Decoherence,
        images: vec![path],
        data: figure_data(&sweep, deco),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoherence::SyntheticProvider;
    use crate::domain::SimulationMode;
    use crate::figures::test_support::scratch_dir;

    #[test]
    fn figure_data_exports_fit_and_gaps() {
        let deco = DecoherenceConfig::default();
        let mut sweep = run_sweep(&deco, 42, &SyntheticProvider).unwrap();
        sweep.simulated = Some(vec![None; sweep.lambdas.len()]);

        let data = figure_data(&sweep, &deco);
        let sim = data.series.iter().find(|s| s.label == "lindblad").unwrap();
        assert!(sim.y.iter().all(|v| v.is_nan()));
        assert_eq!(data.scalar("failed_samples"), Some(sweep.lambdas.len() as f64));
        assert!((data.scalar("lambda0_fit").unwrap() - sweep.lambda0()).abs() < 1e-15);
    }

    #[test]
    fn renders_with_defaults() {
        let dir = scratch_dir("decoherence");
        let cfg = FigureConfig {
            out_dir: dir.clone(),
            ..FigureConfig::default()
        };
        let out = run(&cfg, &DecoherenceConfig::default()).unwrap();
        assert_eq!(out.images, vec![dir.join(FILE_NAME)]);
        assert!(std::fs::metadata(&out.images[0]).unwrap().len() > 0);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn synthetic_only_mode_renders_without_simulation() {
        let dir = scratch_dir("decoherence-off");
        let cfg = FigureConfig {
            out_dir: dir.clone(),
            ..FigureConfig::default()
        };
        let deco = DecoherenceConfig {
            simulation: SimulationMode::Off,
            ..DecoherenceConfig::default()
        };
        let out = run(&cfg, &deco).unwrap();
        assert!(out.data.series.iter().all(|s| s.label != "lindblad"));
        assert_eq!(out.data.scalar("failed_samples"), Some(0.0));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
