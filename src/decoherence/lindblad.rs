//! Two-level open-system evolution under a Lindblad dissipator.
//!
//! Solves the GKSL master equation
//!
//! ```text
//! dρ/dt = -i[H, ρ] + Σ_k (L_k ρ L_k† - ½{L_k† L_k, ρ})
//! ```
//!
//! for a 2×2 density matrix. The constraint field enters as a pure dephasing
//! channel `L = √λ σ_z` with `H = 0`: populations are conserved and the
//! off-diagonal coherence decays as `e^{-2λt}`.

use nalgebra::Matrix2;
use num_complex::Complex64;

use crate::domain::InitialState;
use crate::error::AppError;
use crate::math::{OdeOptions, OdeState, integrate};

pub type DensityMatrix = Matrix2<Complex64>;

/// Largest tolerated `|Tr ρ - 1|` before a run is declared broken.
const TRACE_TOLERANCE: f64 = 1e-6;
/// Slack on hermiticity, positivity and the `[0, 1]` range of expectations.
const STATE_TOLERANCE: f64 = 1e-6;

impl OdeState for DensityMatrix {
    fn add_scaled(&self, k: &Self, h: f64) -> Self {
        self + k.map(|z| z * h)
    }

    fn is_finite(&self) -> bool {
        self.iter().all(|z| z.re.is_finite() && z.im.is_finite())
    }
}

fn real(v: f64) -> Complex64 {
    Complex64::new(v, 0.0)
}

/// `|0⟩⟨0| - |1⟩⟨1|`.
pub fn sigma_z() -> DensityMatrix {
    Matrix2::new(real(1.0), real(0.0), real(0.0), real(-1.0))
}

/// Projector onto the requested initial state.
pub fn projector(state: InitialState) -> DensityMatrix {
    match state {
        InitialState::Ground => Matrix2::new(real(1.0), real(0.0), real(0.0), real(0.0)),
        InitialState::Plus => Matrix2::new(real(0.5), real(0.5), real(0.5), real(0.5)),
    }
}

/// Hamiltonian plus collapse operators of a two-level system.
#[derive(Debug, Clone)]
pub struct TwoLevelSystem {
    pub hamiltonian: DensityMatrix,
    pub collapse: Vec<DensityMatrix>,
}

impl TwoLevelSystem {
    /// Pure dephasing at rate `λ`: `H = 0`, `L = √λ σ_z`.
    pub fn dephasing(lambda: f64) -> Result<Self, AppError> {
        if !lambda.is_finite() || lambda < 0.0 {
            return Err(AppError::numerical(format!(
                "Dephasing rate must be finite and >= 0 (got {lambda})."
            )));
        }
        let l = sigma_z().map(|z| z * lambda.sqrt());
        Ok(Self {
            hamiltonian: DensityMatrix::zeros(),
            collapse: vec![l],
        })
    }

    /// Right-hand side of the master equation at `ρ`.
    pub fn rhs(&self, rho: &DensityMatrix) -> DensityMatrix {
        let minus_i = Complex64::new(0.0, -1.0);
        let h = &self.hamiltonian;
        let mut out = (h * rho - rho * h).map(|z| z * minus_i);

        for l in &self.collapse {
            let l_dag = l.adjoint();
            let l_dag_l = l_dag * l;
            let anti = l_dag_l * rho + rho * l_dag_l;
            out += l * rho * l_dag - anti.map(|z| z * 0.5);
        }
        out
    }

    /// Upper bound on the dissipator's decay rate, `2 Σ_k ‖L_k† L_k‖`.
    pub fn stiffness(&self) -> f64 {
        self.collapse
            .iter()
            .map(|l| 2.0 * (l.adjoint() * l).norm())
            .sum()
    }

    /// `max_step` shrunk so that `h · stiffness ≤ 1`, inside RK4's stability region.
    pub fn stable_options(&self, opts: OdeOptions) -> OdeOptions {
        let rate = self.stiffness();
        if rate > 0.0 && rate.is_finite() {
            OdeOptions {
                max_step: opts.max_step.min(1.0 / rate),
                ..opts
            }
        } else {
            opts
        }
    }
}

/// Rejects a density matrix that is not Hermitian or not positive.
fn check_physical(rho: &DensityMatrix, t: f64) -> Result<(), AppError> {
    let skew = (rho - rho.adjoint()).norm();
    if skew > STATE_TOLERANCE {
        return Err(AppError::numerical(format!("Density matrix lost hermiticity ({skew:.3e}) at t={t}.")));
    }
    let (p0, p1) = (rho[(0, 0)].re, rho[(1, 1)].re);
    let coherence = rho[(0, 1)].norm_sqr();
    if p0 < -STATE_TOLERANCE || p1 < -STATE_TOLERANCE || coherence > p0 * p1 + STATE_TOLERANCE {
        return Err(AppError::numerical(format!(
            "Density matrix is not positive at t={t} (|ρ01|²={coherence:.3e}, ρ00={p0:.3e}, ρ11={p1:.3e})."
        )));
    }
    Ok(())
}

/// Evolve `rho0` over `times` and return `Tr(O ρ(t))` at every time.
///
/// The internal step is capped by [`TwoLevelSystem::stable_options`]. Fails if
/// the integrator fails, the trace drifts away from 1, the state stops being a
/// density matrix, or an expectation leaves `[0, 1]`.
pub fn expectation_series(
    system: &TwoLevelSystem,
    rho0: DensityMatrix,
    observable: &DensityMatrix,
    times: &[f64],
    opts: OdeOptions,
) -> Result<Vec<f64>, AppError> {
    let opts = system.stable_options(opts);
    let states = integrate(|_, rho: &DensityMatrix| system.rhs(rho), rho0, times, opts)?;

    let mut out = Vec::with_capacity(states.len());
    for (t, rho) in times.iter().zip(states.iter()) {
        let trace = rho.trace();
        if (trace.re - 1.0).abs() > TRACE_TOLERANCE || trace.im.abs() > TRACE_TOLERANCE {
            return Err(AppError::numerical(format!(
                "Trace drifted to {:.3e}{:+.3e}i at t={t}.",
                trace.re, trace.im
            )));
        }
        check_physical(rho, *t)?;
        let value = (observable * rho).trace().re;
        if !(-STATE_TOLERANCE..=1.0 + STATE_TOLERANCE).contains(&value) {
            return Err(AppError::numerical(format!("Expectation {value:.3e} outside [0, 1] at t={t}.")));
        }
        out.push(value);
    }
    Ok(out)
}

/// Final-time overlap with the initial state under dephasing rate `λ`.
pub fn final_overlap(
    lambda: f64,
    initial: InitialState,
    times: &[f64],
    opts: OdeOptions,
) -> Result<f64, AppError> {
    let system = TwoLevelSystem::dephasing(lambda)?;
    let rho0 = projector(initial);
    let series = expectation_series(&system, rho0, &rho0, times, opts)?;
    series
        .last()
        .copied()
        .ok_or_else(|| AppError::numerical("Empty expectation values."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::linspace;

    #[test]
    fn dephasing_conserves_ground_population() {
        let times = linspace(0.0, 10.0, 100);
        let p = final_overlap(2.0, InitialState::Ground, &times, OdeOptions::default()).unwrap();
        assert!((p - 1.0).abs() < 1e-12);
    }

    #[test]
    fn plus_state_coherence_decays_at_twice_the_rate() {
        let times = linspace(0.0, 2.0, 21);
        let lambda = 0.7;
        let system = TwoLevelSystem::dephasing(lambda).unwrap();
        let rho0 = projector(InitialState::Plus);
        let series = expectation_series(&system, rho0, &rho0, &times, OdeOptions::default()).unwrap();
        for (t, p) in times.iter().zip(series.iter()) {
            let expected = 0.5 * (1.0 + (-2.0 * lambda * t).exp());
            assert!((p - expected).abs() < 1e-9, "t={t}: {p} vs {expected}");
        }
    }

    #[test]
    fn rhs_is_traceless_and_hermitian() {
        let system = TwoLevelSystem::dephasing(1.3).unwrap();
        let rho = projector(InitialState::Plus);
        let d = system.rhs(&rho);
        assert!(d.trace().norm() < 1e-15);
        assert!((d - d.adjoint()).norm() < 1e-15);
    }

    #[test]
    fn strong_dephasing_stays_stable() {
        let times = linspace(0.0, 10.0, 100);
        let p = final_overlap(165.0, InitialState::Plus, &times, OdeOptions::default()).unwrap();
        assert!((p - 0.5).abs() < 1e-9, "p={p}");
    }

    #[test]
    fn step_is_capped_by_the_dephasing_rate() {
        let system = TwoLevelSystem::dephasing(165.0).unwrap();
        assert!((system.stiffness() - 2.0 * 165.0 * 2f64.sqrt()).abs() < 1e-9);
        let opts = system.stable_options(OdeOptions::default());
        assert!(opts.max_step * 2.0 * 165.0 <= 1.0);

        let idle = TwoLevelSystem::dephasing(0.0).unwrap();
        assert_eq!(idle.stable_options(OdeOptions::default()).max_step, 1e-2);
    }

    #[test]
    fn unphysical_state_is_rejected() {
        let times = [0.0, 0.1];
        let system = TwoLevelSystem::dephasing(0.0).unwrap();
        let rho0 = Matrix2::new(real(0.5), real(0.9), real(0.9), real(0.5));
        let err = expectation_series(&system, rho0, &rho0, &times, OdeOptions::default()).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn negative_rate_is_rejected() {
        let err = TwoLevelSystem::dephasing(-0.1).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn step_budget_failure_surfaces_as_error() {
        let times = linspace(0.0, 10.0, 100);
        let opts = OdeOptions {
            max_step: 1e-3,
            max_steps: 50,
        };
        assert!(final_overlap(1.0, InitialState::Ground, &times, opts).is_err());
    }
}
