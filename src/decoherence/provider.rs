//! Simulation capability, selected once per run.

#[cfg(feature = "lindblad")]
use rayon::prelude::*;
use tracing::{info, warn};

use crate::domain::{DecoherenceConfig, SimulationMode};
use crate::error::AppError;

/// Produces simulated branching probabilities for a λ sweep.
pub trait SimulationProvider: Sync {
    fn name(&self) -> &'static str;

    /// Simulated value for each λ, in input order, or `None` when this
    /// provider does not simulate at all. A failed sample is `Some(None)` at
    /// its position; one bad λ never aborts the sweep.
    fn simulate(&self, lambdas: &[f64], cfg: &DecoherenceConfig) -> Option<Vec<Option<f64>>>;
}

/// Closed-form data only.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticProvider;

impl SimulationProvider for SyntheticProvider {
    fn name(&self) -> &'static str {
        "synthetic"
    }

    fn simulate(&self, _lambdas: &[f64], _cfg: &DecoherenceConfig) -> Option<Vec<Option<f64>>> {
        None
    }
}

/// Two-level Lindblad evolution per λ.
#[cfg(feature = "lindblad")]
#[derive(Debug, Clone, Copy, Default)]
pub struct LindbladProvider;

#[cfg(feature = "lindblad")]
impl LindbladProvider {
    /// Final-time projector overlap for one constraint strength.
    pub fn sample(&self, lambda: f64, cfg: &DecoherenceConfig) -> Result<f64, AppError> {
        use crate::decoherence::lindblad::final_overlap;
        use crate::math::{OdeOptions, linspace};

        let times = linspace(0.0, cfg.t_final, cfg.t_points);
        let opts = OdeOptions {
            max_steps: cfg.max_steps,
            ..OdeOptions::default()
        };
        final_overlap(lambda, cfg.initial_state, &times, opts)
    }
}

#[cfg(feature = "lindblad")]
impl SimulationProvider for LindbladProvider {
    fn name(&self) -> &'static str {
        "lindblad"
    }

    fn simulate(&self, lambdas: &[f64], cfg: &DecoherenceConfig) -> Option<Vec<Option<f64>>> {
        let values = lambdas
            .par_iter()
            .map(|&lambda| match self.sample(lambda, cfg) {
                Ok(p) if p.is_finite() => Some(p),
                Ok(p) => {
                    warn!(lambda, value = p, "Simulation produced a non-finite value");
                    None
                }
                Err(e) => {
                    warn!(lambda, error = %e, "Simulation failed");
                    None
                }
            })
            .collect();
        Some(values)
    }
}

/// Whether the Lindblad simulation was compiled in.
pub fn simulation_available() -> bool {
    cfg!(feature = "lindblad")
}

/// Pick the provider for `mode`.
///
/// `On` without the capability is an error (exit code 3); `Auto` falls back to
/// synthetic data with a warning.
pub fn select_provider(mode: SimulationMode) -> Result<Box<dyn SimulationProvider>, AppError> {
    match mode {
        SimulationMode::Off => Ok(Box::new(SyntheticProvider)),
        SimulationMode::On => {
            if simulation_available() {
                Ok(lindblad_provider())
            } else {
                Err(AppError::unavailable(
                    "Lindblad simulation requested but this build was compiled without the `lindblad` feature.",
                ))
            }
        }
        SimulationMode::Auto => {
            if simulation_available() {
                info!("Using Lindblad simulation");
                Ok(lindblad_provider())
            } else {
                warn!("Lindblad simulation unavailable - using synthetic data only");
                Ok(Box::new(SyntheticProvider))
            }
        }
    }
}

#[cfg(feature = "lindblad")]
fn lindblad_provider() -> Box<dyn SimulationProvider> {
    Box::new(LindbladProvider)
}

#[cfg(not(feature = "lindblad"))]
fn lindblad_provider() -> Box<dyn SimulationProvider> {
    Box::new(SyntheticProvider)
}
