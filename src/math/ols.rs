//! Linear least squares.
//!
//! The nonlinear fitter reduces every damped Gauss–Newton step to a small
//! linear problem
//!
//! ```text
//! minimize ‖A δ - b‖²
//! ```
//!
//! where `A` is the Jacobian stacked on top of the damping rows. `A` is tall
//! (one row per sample plus one per parameter) and can be close to rank
//! deficient when a parameter barely moves the model, so we solve through the
//! SVD rather than the normal equations. Nalgebra's `QR::solve` only handles
//! square systems.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(a: &DMatrix<f64>, b: &DVector<f64>) -> Option<DVector<f64>> {
    if a.nrows() != b.len() || a.ncols() == 0 {
        return None;
    }
    let svd = a.clone().svd(true, true);

    // Try progressively looser singular-value cutoffs.
    for &tol in &[1e-12, 1e-10, 1e-8] {
        if let Ok(x) = svd.solve(b, tol) {
            if x.iter().all(|v| v.is_finite()) {
                return Some(x);
            }
        }
    }

    None
}

/// Sum of squared entries.
pub fn sum_squares(v: &DVector<f64>) -> f64 {
    v.iter().map(|x| x * x).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_squares_recovers_line_through_noisy_points() {
        // Perturbed samples of y = 1 - 2x; closed-form OLS gives 1.06 - 2.04x.
        let a = DMatrix::from_row_slice(4, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0, 1.0, 3.0]);
        let b = DVector::from_row_slice(&[1.1, -1.1, -2.9, -5.1]);
        let x = solve_least_squares(&a, &b).unwrap();
        assert!((x[0] - 1.06).abs() < 1e-10);
        assert!((x[1] + 2.04).abs() < 1e-10);
    }

    #[test]
    fn mismatched_shapes_are_rejected() {
        let a = DMatrix::<f64>::zeros(3, 2);
        let b = DVector::<f64>::zeros(2);
        assert!(solve_least_squares(&a, &b).is_none());
    }

    #[test]
    fn sum_squares_basic() {
        assert_eq!(sum_squares(&DVector::from_row_slice(&[3.0, 4.0])), 25.0);
    }
}
