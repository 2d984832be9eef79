//! Nonlinear least-squares curve fitting (Levenberg–Marquardt).
//!
//! Given samples `(x_i, y_i)` and a model `f(x, p)` we minimize
//!
//! ```text
//! SSE(p) = Σ (y_i - f(x_i, p))²
//! ```
//!
//! Each iteration linearizes the model with a forward-difference Jacobian `J`
//! and solves the damped step as an augmented linear least-squares problem:
//!
//! ```text
//! [ J      ] δ ≈ [ r ]
//! [ √μ · D ]     [ 0 ]
//! ```
//!
//! with `D` the column norms of `J` (Marquardt scaling). Accepted steps shrink
//! the damping `μ`, rejected steps grow it.

use nalgebra::{DMatrix, DVector};

use crate::error::AppError;
use crate::math::ols::{solve_least_squares, sum_squares};

/// Fitting controls.
#[derive(Debug, Clone)]
pub struct CurveFitOptions {
    pub max_iter: usize,
    /// Relative SSE decrease below which the fit is considered converged.
    pub ftol: f64,
    /// Relative step size below which the fit is considered converged.
    pub xtol: f64,
    /// Initial damping `μ`.
    pub initial_damping: f64,
    /// Relative finite-difference step for the Jacobian.
    pub jacobian_step: f64,
}

impl Default for CurveFitOptions {
    fn default() -> Self {
        Self {
            max_iter: 200,
            ftol: 1e-14,
            xtol: 1e-12,
            initial_damping: 1e-3,
            jacobian_step: 1.49e-8,
        }
    }
}

/// Result of a successful fit.
#[derive(Debug, Clone)]
pub struct CurveFit {
    pub params: Vec<f64>,
    /// Parameter covariance `(JᵀJ)⁻¹ · SSE / (n - p)`; `None` when it cannot be
    /// estimated (singular Jacobian or no residual degrees of freedom).
    pub covariance: Option<DMatrix<f64>>,
    pub sse: f64,
    pub rmse: f64,
    /// Number of finite samples used.
    pub n: usize,
    pub iterations: usize,
}

impl CurveFit {
    /// One-sigma parameter uncertainties from the covariance diagonal.
    pub fn std_errors(&self) -> Option<Vec<f64>> {
        let cov = self.covariance.as_ref()?;
        Some((0..cov.nrows()).map(|i| cov[(i, i)].max(0.0).sqrt()).collect())
    }
}

/// Fit `model(x, params)` to `(x, y)` starting from `p0`.
///
/// Pairs where either coordinate is non-finite are dropped before fitting, so
/// a sweep with missing samples can be fitted directly.
pub fn curve_fit<F>(
    model: F,
    x: &[f64],
    y: &[f64],
    p0: &[f64],
    opts: &CurveFitOptions,
) -> Result<CurveFit, AppError>
where
    F: Fn(f64, &[f64]) -> f64,
{
    if x.len() != y.len() {
        return Err(AppError::invalid(format!(
            "curve_fit: x and y lengths differ ({} vs {}).",
            x.len(),
            y.len()
        )));
    }
    if p0.is_empty() {
        return Err(AppError::invalid("curve_fit: need at least one parameter."));
    }

    let (xs, ys): (Vec<f64>, Vec<f64>) = x
        .iter()
        .zip(y.iter())
        .filter(|(a, b)| a.is_finite() && b.is_finite())
        .map(|(&a, &b)| (a, b))
        .unzip();

    let n = xs.len();
    let p = p0.len();
    if n < p {
        return Err(AppError::numerical(format!(
            "curve_fit: {n} finite samples cannot determine {p} parameters."
        )));
    }

    let residuals = |params: &[f64]| -> DVector<f64> {
        DVector::from_iterator(n, xs.iter().zip(ys.iter()).map(|(&xi, &yi)| yi - model(xi, params)))
    };

    let mut params = p0.to_vec();
    let mut r = residuals(params.as_slice());
    let mut sse = sum_squares(&r);
    if !sse.is_finite() {
        return Err(AppError::numerical("curve_fit: model is not finite at the initial guess."));
    }

    let mut mu = opts.initial_damping;
    let mut converged = false;
    let mut iterations = 0;
    let mut accepted = 0usize;

    while iterations < opts.max_iter {
        iterations += 1;
        let jac = jacobian(&model, &xs, &params, opts.jacobian_step);

        // Augmented system [J; √μ D] δ = [r; 0].
        let mut a = DMatrix::<f64>::zeros(n + p, p);
        a.view_mut((0, 0), (n, p)).copy_from(&jac);
        for j in 0..p {
            let col_norm = jac.column(j).norm().max(1e-12);
            a[(n + j, j)] = mu.sqrt() * col_norm;
        }
        let mut b = DVector::<f64>::zeros(n + p);
        b.rows_mut(0, n).copy_from(&r);

        let Some(delta) = solve_least_squares(&a, &b) else {
            mu *= 10.0;
            if mu > 1e16 {
                break;
            }
            continue;
        };

        let candidate: Vec<f64> = params.iter().zip(delta.iter()).map(|(pi, di)| pi + di).collect();
        let r_new = residuals(candidate.as_slice());
        let sse_new = sum_squares(&r_new);

        if sse_new.is_finite() && sse_new <= sse {
            let improvement = sse - sse_new;
            let step_norm = delta.norm();
            let param_norm = candidate.iter().map(|v| v * v).sum::<f64>().sqrt();

            params = candidate;
            accepted += 1;
            r = r_new;
            sse = sse_new;
            mu = (mu / 10.0).max(1e-15);

            if improvement <= opts.ftol * sse.max(f64::MIN_POSITIVE)
                || step_norm <= opts.xtol * (param_norm + opts.xtol)
                || sse <= 1e-28 * n as f64
            {
                converged = true;
                break;
            }
        } else {
            mu *= 10.0;
            if mu > 1e16 {
                if accepted == 0 && sse > 1e-28 * n as f64 {
                    return Err(AppError::numerical(format!(
                        "curve_fit: no step from the initial guess reduced SSE={sse:.3e}."
                    )));
                }
                tracing::debug!(iterations, accepted, sse, "curve_fit: damping ceiling reached");
                converged = true;
                break;
            }
        }
    }

    if !converged {
        return Err(AppError::numerical(format!(
            "curve_fit: no convergence after {} iterations (SSE={sse:.3e}).",
            opts.max_iter
        )));
    }

    let jac = jacobian(&model, &xs, &params, opts.jacobian_step);
    let covariance = if n > p {
        (jac.transpose() * &jac)
            .try_inverse()
            .map(|inv| inv * (sse / (n - p) as f64))
    } else {
        None
    };

    tracing::debug!(iterations, sse, ?params, "curve_fit converged");

    Ok(CurveFit {
        params,
        covariance,
        sse,
        rmse: (sse / n as f64).sqrt(),
        n,
        iterations,
    })
}

/// Forward-difference Jacobian `∂f(x_i, p)/∂p_j`.
fn jacobian<F>(model: &F, xs: &[f64], params: &[f64], rel_step: f64) -> DMatrix<f64>
where
    F: Fn(f64, &[f64]) -> f64,
{
    let n = xs.len();
    let p = params.len();
    let mut jac = DMatrix::<f64>::zeros(n, p);
    let mut shifted = params.to_vec();

    for j in 0..p {
        let h = rel_step * params[j].abs().max(1.0);
        shifted[j] = params[j] + h;
        for (i, &xi) in xs.iter().enumerate() {
            jac[(i, j)] = (model(xi, shifted.as_slice()) - model(xi, params)) / h;
        }
        shifted[j] = params[j];
    }
    jac
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::grid::linspace;

    fn decay(x: f64, p: &[f64]) -> f64 {
        p[1] * (-x / p[0]).exp()
    }

    #[test]
    fn recovers_generating_parameters_from_clean_data() {
        let x = linspace(0.0, 3.0, 100);
        let y: Vec<f64> = x.iter().map(|&v| decay(v, &[0.7, 1.3])).collect();
        let fit = curve_fit(decay, &x, &y, &[1.0, 1.0], &CurveFitOptions::default()).unwrap();
        assert!((fit.params[0] - 0.7).abs() < 1e-6, "lambda0={}", fit.params[0]);
        assert!((fit.params[1] - 1.3).abs() < 1e-6, "p0={}", fit.params[1]);
        assert!(fit.sse < 1e-12);
    }

    #[test]
    fn stalling_at_the_initial_guess_is_an_error() {
        // Any move away from p = 0 makes the fit worse.
        let step = |x: f64, p: &[f64]| if p[0] == 0.0 { x } else { 10.0 * x };
        let x = linspace(0.1, 1.0, 10);
        let y: Vec<f64> = x.iter().map(|&v| 1.5 * v).collect();
        let err = curve_fit(step, &x, &y, &[0.0], &CurveFitOptions::default()).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn exact_initial_guess_is_accepted() {
        let x = linspace(0.0, 3.0, 20);
        let y: Vec<f64> = x.iter().map(|&v| decay(v, &[0.7, 1.3])).collect();
        let fit = curve_fit(decay, &x, &y, &[0.7, 1.3], &CurveFitOptions::default()).unwrap();
        assert!((fit.params[0] - 0.7).abs() < 1e-9);
        assert!(fit.sse < 1e-20);
    }

    #[test]
    fn fits_linear_model() {
        let x = linspace(-1.0, 1.0, 9);
        let y: Vec<f64> = x.iter().map(|&v| 2.0 + 0.5 * v).collect();
        let fit = curve_fit(|x, p| p[0] + p[1] * x, &x, &y, &[0.0, 0.0], &CurveFitOptions::default())
            .unwrap();
        assert!((fit.params[0] - 2.0).abs() < 1e-8);
        assert!((fit.params[1] - 0.5).abs() < 1e-8);
    }

    #[test]
    fn non_finite_samples_are_dropped() {
        let x = vec![0.0, 1.0, 2.0, 3.0, 4.0];
        let y = vec![1.0, f64::NAN, (-2.0_f64).exp(), (-3.0_f64).exp(), (-4.0_f64).exp()];
        let fit = curve_fit(decay, &x, &y, &[2.0, 0.5], &CurveFitOptions::default()).unwrap();
        assert_eq!(fit.n, 4);
        assert!((fit.params[0] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn covariance_reported_for_noisy_data() {
        let x = linspace(0.0, 3.0, 40);
        let y: Vec<f64> = x
            .iter()
            .enumerate()
            .map(|(i, &v)| decay(v, &[1.0, 1.0]) * (1.0 + if i % 2 == 0 { 0.02 } else { -0.02 }))
            .collect();
        let fit = curve_fit(decay, &x, &y, &[1.0, 1.0], &CurveFitOptions::default()).unwrap();
        let errs = fit.std_errors().unwrap();
        assert!(errs.iter().all(|e| e.is_finite() && *e > 0.0));
        assert!((fit.params[0] - 1.0).abs() < 0.05);
    }

    #[test]
    fn too_few_samples_is_an_error() {
        let err = curve_fit(decay, &[1.0], &[0.5], &[1.0, 1.0], &CurveFitOptions::default()).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }
}
