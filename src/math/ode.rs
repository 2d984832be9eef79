//! Fixed-step Runge–Kutta integration.
//!
//! `integrate` mirrors the "solve on a time list" style: the caller supplies
//! the times at which the state is wanted, and the integrator sub-steps each
//! interval so no internal step exceeds `max_step`.
//!
//! A step budget bounds the total work. Exhausting it is an error rather than
//! a silent truncation, the same contract an adaptive solver's `nsteps` has.

use nalgebra::SMatrix;

use crate::error::AppError;

/// A state vector the integrator can combine linearly.
pub trait OdeState: Clone {
    /// `self + h · k`.
    fn add_scaled(&self, k: &Self, h: f64) -> Self;

    /// Whether every component is finite.
    fn is_finite(&self) -> bool;
}

impl<const R: usize, const C: usize> OdeState for SMatrix<f64, R, C> {
    fn add_scaled(&self, k: &Self, h: f64) -> Self {
        self + k * h
    }

    fn is_finite(&self) -> bool {
        self.iter().all(|v| v.is_finite())
    }
}

/// Integration controls.
#[derive(Debug, Clone, Copy)]
pub struct OdeOptions {
    /// Largest internal step.
    pub max_step: f64,
    /// Total internal steps allowed across the whole time list.
    pub max_steps: usize,
}

impl Default for OdeOptions {
    fn default() -> Self {
        Self {
            max_step: 1e-2,
            max_steps: 100_000,
        }
    }
}

/// One classical RK4 step of size `h` from `(t, y)`.
pub fn rk4_step<S, F>(rhs: &F, t: f64, y: &S, h: f64) -> S
where
    S: OdeState,
    F: Fn(f64, &S) -> S,
{
    let k1 = rhs(t, y);
    let k2 = rhs(t + 0.5 * h, &y.add_scaled(&k1, 0.5 * h));
    let k3 = rhs(t + 0.5 * h, &y.add_scaled(&k2, 0.5 * h));
    let k4 = rhs(t + h, &y.add_scaled(&k3, h));

    y.add_scaled(&k1, h / 6.0)
        .add_scaled(&k2, h / 3.0)
        .add_scaled(&k3, h / 3.0)
        .add_scaled(&k4, h / 6.0)
}

/// Integrate `dy/dt = rhs(t, y)` and return the state at each of `times`.
///
/// `times` must be non-decreasing; `y0` is the state at `times[0]` and is
/// returned as the first element.
pub fn integrate<S, F>(rhs: F, y0: S, times: &[f64], opts: OdeOptions) -> Result<Vec<S>, AppError>
where
    S: OdeState,
    F: Fn(f64, &S) -> S,
{
    if times.is_empty() {
        return Ok(Vec::new());
    }
    if !(opts.max_step.is_finite() && opts.max_step > 0.0) {
        return Err(AppError::invalid(format!("Invalid max_step: {}", opts.max_step)));
    }
    if !y0.is_finite() {
        return Err(AppError::numerical("Initial state is not finite."));
    }

    let mut out = Vec::with_capacity(times.len());
    let mut y = y0;
    let mut steps_taken = 0usize;
    out.push(y.clone());

    for w in times.windows(2) {
        let (t0, t1) = (w[0], w[1]);
        let span = t1 - t0;
        if span < 0.0 || !span.is_finite() {
            return Err(AppError::invalid(format!(
                "Time list must be finite and non-decreasing (got {t0} -> {t1})."
            )));
        }
        if span == 0.0 {
            out.push(y.clone());
            continue;
        }

        let n_sub = (span / opts.max_step).ceil().max(1.0) as usize;
        if steps_taken + n_sub > opts.max_steps {
            return Err(AppError::numerical(format!(
                "Step budget exhausted at t={t0} ({} steps allowed).",
                opts.max_steps
            )));
        }

        let h = span / n_sub as f64;
        for k in 0..n_sub {
            y = rk4_step(&rhs, t0 + h * k as f64, &y, h);
        }
        steps_taken += n_sub;

        if !y.is_finite() {
            return Err(AppError::numerical(format!("State became non-finite at t={t1}.")));
        }
        out.push(y.clone());
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::grid::linspace;
    use nalgebra::Vector2;

    #[test]
    fn rk4_reproduces_exponential_decay() {
        let times = linspace(0.0, 2.0, 11);
        let y0 = SMatrix::<f64, 1, 1>::new(1.0);
        let ys = integrate(|_, y| -y * 1.5, y0, &times, OdeOptions::default()).unwrap();
        for (t, y) in times.iter().zip(ys.iter()) {
            assert!((y[0] - (-1.5 * t).exp()).abs() < 1e-9);
        }
    }

    #[test]
    fn harmonic_oscillator_conserves_energy() {
        let times = linspace(0.0, 10.0, 50);
        let y0 = Vector2::new(1.0, 0.0);
        let ys = integrate(
            |_, y: &Vector2<f64>| Vector2::new(y[1], -y[0]),
            y0,
            &times,
            OdeOptions::default(),
        )
        .unwrap();
        let last = ys.last().unwrap();
        let energy = last[0] * last[0] + last[1] * last[1];
        assert!((energy - 1.0).abs() < 1e-8);
        assert!((last[0] - 10.0_f64.cos()).abs() < 1e-7);
    }

    #[test]
    fn step_budget_is_enforced() {
        let times = [0.0, 1.0];
        let opts = OdeOptions {
            max_step: 1e-3,
            max_steps: 10,
        };
        let err = integrate(|_, y| *y, SMatrix::<f64, 1, 1>::new(1.0), &times, opts).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn blow_up_is_reported() {
        let times = [0.0, 5.0];
        let y0 = SMatrix::<f64, 1, 1>::new(1.0);
        let err = integrate(|_, y| y * 1e3, y0, &times, OdeOptions::default()).unwrap_err();
        assert!(err.message().contains("non-finite"));
    }
}
