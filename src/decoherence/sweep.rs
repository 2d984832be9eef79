//! λ sweep: synthetic data, optional simulation, and the decay fit.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;
use tracing::{debug, info};

use crate::decoherence::provider::SimulationProvider;
use crate::domain::DecoherenceConfig;
use crate::error::AppError;
use crate::math::{CurveFit, CurveFitOptions, curve_fit, linspace};
use crate::models::{decay_model, theoretical_decay};

/// Initial guess `[λ0, P0]` for the decay fit.
pub const FIT_INITIAL_GUESS: [f64; 2] = [1.0, 1.0];

/// Everything the decoherence figure needs.
#[derive(Debug, Clone)]
pub struct DecoherenceSweep {
    pub lambdas: Vec<f64>,
    pub synthetic: Vec<f64>,
    /// `None` when no simulation ran; inner `None` marks a failed sample.
    pub simulated: Option<Vec<Option<f64>>>,
    pub provider: &'static str,
    pub fit: CurveFit,
    /// Fitted model on `lambdas`.
    pub fitted: Vec<f64>,
    pub synthetic_residuals: Vec<f64>,
    pub simulated_residuals: Option<Vec<Option<f64>>>,
}

impl DecoherenceSweep {
    pub fn lambda0(&self) -> f64 {
        self.fit.params[0]
    }

    pub fn p0(&self) -> f64 {
        self.fit.params[1]
    }

    /// Number of simulation samples that failed.
    pub fn failed_samples(&self) -> usize {
        self.simulated
            .as_ref()
            .map(|v| v.iter().filter(|s| s.is_none()).count())
            .unwrap_or(0)
    }
}

pub fn validate_config(cfg: &DecoherenceConfig) -> Result<(), AppError> {
    if !(cfg.lambda_min.is_finite() && cfg.lambda_max.is_finite() && cfg.lambda_max > cfg.lambda_min) {
        return Err(AppError::invalid(format!(
            "Invalid λ range [{}, {}].",
            cfg.lambda_min, cfg.lambda_max
        )));
    }
    if cfg.points < 3 {
        return Err(AppError::invalid("Need at least 3 λ samples to fit two parameters."));
    }
    if !(cfg.lambda0.is_finite() && cfg.lambda0 > 0.0) {
        return Err(AppError::invalid("λ0 must be > 0."));
    }
    if !cfg.p0.is_finite() {
        return Err(AppError::invalid("P0 must be finite."));
    }
    if !(cfg.noise.is_finite() && cfg.noise >= 0.0) {
        return Err(AppError::invalid("Noise level must be >= 0."));
    }
    if !(cfg.t_final.is_finite() && cfg.t_final > 0.0) || cfg.t_points < 2 {
        return Err(AppError::invalid("Evolution window needs t_final > 0 and at least 2 times."));
    }
    Ok(())
}

/// Closed-form decay with multiplicative Gaussian noise `P · (1 + noise·z)`.
pub fn synthetic_probabilities(lambdas: &[f64], cfg: &DecoherenceConfig, seed: u64) -> Result<Vec<f64>, AppError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| AppError::numerical(format!("Noise distribution error: {e}")))?;

    Ok(lambdas
        .iter()
        .map(|&lambda| {
            let z: f64 = normal.sample(&mut rng);
            theoretical_decay(lambda, cfg.lambda0, cfg.p0) * (1.0 + cfg.noise * z)
        })
        .collect())
}

/// Run the whole sweep with `provider`.
pub fn run_sweep(
    cfg: &DecoherenceConfig,
    seed: u64,
    provider: &dyn SimulationProvider,
) -> Result<DecoherenceSweep, AppError> {
    validate_config(cfg)?;

    let lambdas = linspace(cfg.lambda_min, cfg.lambda_max, cfg.points);
    let synthetic = synthetic_probabilities(&lambdas, cfg, seed)?;
    let simulated = provider.simulate(&lambdas, cfg);

    if let Some(values) = &simulated {
        let failed = values.iter().filter(|v| v.is_none()).count();
        info!(provider = provider.name(), samples = values.len(), failed, "Simulation finished");
    }

    let fit = curve_fit(decay_model, &lambdas, &synthetic, &FIT_INITIAL_GUESS, &CurveFitOptions::default())?;
    debug!(params = ?fit.params, rmse = fit.rmse, iterations = fit.iterations, "Decay fit");

    let fitted: Vec<f64> = lambdas.iter().map(|&l| decay_model(l, &fit.params)).collect();
    let synthetic_residuals = synthetic.iter().zip(fitted.iter()).map(|(y, f)| y - f).collect();
    let simulated_residuals = simulated.as_ref().map(|values| {
        values
            .iter()
            .zip(fitted.iter())
            .map(|(v, f)| v.map(|y| y - f))
            .collect()
    });

    Ok(DecoherenceSweep {
        lambdas,
        synthetic,
        simulated,
        provider: provider.name(),
        fit,
        fitted,
        synthetic_residuals,
        simulated_residuals,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoherence::provider::SyntheticProvider;

    /// Fails on every negative λ, returns the closed form elsewhere.
    struct Flaky;

    impl SimulationProvider for Flaky {
        fn name(&self) -> &'static str {
            "flaky"
        }

        fn simulate(&self, lambdas: &[f64], _cfg: &DecoherenceConfig) -> Option<Vec<Option<f64>>> {
            Some(
                lambdas
                    .iter()
                    .map(|&l| (l >= 0.0).then(|| theoretical_decay(l, 1.0, 1.0)))
                    .collect(),
            )
        }
    }

    #[test]
    fn noise_free_fit_recovers_generating_parameters() {
        let cfg = DecoherenceConfig {
            noise: 0.0,
            lambda0: 0.8,
            p0: 0.9,
            ..DecoherenceConfig::default()
        };
        let sweep = run_sweep(&cfg, 42, &SyntheticProvider).unwrap();
        assert!((sweep.lambda0() - 0.8).abs() < 1e-6);
        assert!((sweep.p0() - 0.9).abs() < 1e-6);
        assert!(sweep.synthetic_residuals.iter().all(|r| r.abs() < 1e-6));
        assert!(sweep.simulated.is_none());
        assert_eq!(sweep.failed_samples(), 0);
    }

    #[test]
    fn noisy_fit_lands_near_truth_with_uncertainty() {
        let sweep = run_sweep(&DecoherenceConfig::default(), 42, &SyntheticProvider).unwrap();
        assert!((sweep.lambda0() - 1.0).abs() < 0.1);
        assert!((sweep.p0() - 1.0).abs() < 0.1);
        let se = sweep.fit.std_errors().unwrap();
        assert!(se.iter().all(|s| s.is_finite() && *s > 0.0));
    }

    #[test]
    fn synthetic_data_is_reproducible_for_a_seed() {
        let cfg = DecoherenceConfig::default();
        let lambdas = linspace(0.0, 3.0, 10);
        let a = synthetic_probabilities(&lambdas, &cfg, 7).unwrap();
        let b = synthetic_probabilities(&lambdas, &cfg, 7).unwrap();
        let c = synthetic_probabilities(&lambdas, &cfg, 8).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn failed_samples_do_not_abort_the_sweep() {
        let cfg = DecoherenceConfig {
            lambda_min: -1.0,
            lambda_max: 1.0,
            points: 5,
            ..DecoherenceConfig::default()
        };
        let sweep = run_sweep(&cfg, 42, &Flaky).unwrap();
        let sim = sweep.simulated.as_ref().unwrap();
        assert_eq!(sim.len(), 5);
        assert_eq!(sweep.failed_samples(), 2);
        let res = sweep.simulated_residuals.as_ref().unwrap();
        assert!(res[0].is_none() && res[1].is_none());
        assert!(res[2].is_some());
    }

    #[test]
    fn invalid_range_is_rejected() {
        let cfg = DecoherenceConfig {
            lambda_min: 2.0,
            lambda_max: 1.0,
            ..DecoherenceConfig::default()
        };
        let err = run_sweep(&cfg, 42, &SyntheticProvider).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[cfg(feature = "lindblad")]
    #[test]
    fn lindblad_plus_state_tracks_dephasing() {
        use crate::decoherence::provider::LindbladProvider;
        use crate::domain::InitialState;

        let cfg = DecoherenceConfig {
            points: 7,
            initial_state: InitialState::Plus,
            ..DecoherenceConfig::default()
        };
        let sweep = run_sweep(&cfg, 42, &LindbladProvider).unwrap();
        let sim = sweep.simulated.as_ref().unwrap();
        for (&l, v) in sweep.lambdas.iter().zip(sim.iter()) {
            let expected = 0.5 * (1.0 + (-2.0 * l * cfg.t_final).exp());
            assert!((v.unwrap() - expected).abs() < 1e-6, "λ={l}");
        }
    }
}
