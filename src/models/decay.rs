//! Closed-form decoherence suppression.

/// Branching probability `P(λ) = P0 · exp(-λ/λ0)`.
pub fn theoretical_decay(lambda: f64, lambda0: f64, p0: f64) -> f64 {
    p0 * (-lambda / lambda0).exp()
}

/// [`theoretical_decay`] in curve-fit form, `params = [λ0, P0]`.
pub fn decay_model(lambda: f64, params: &[f64]) -> f64 {
    theoretical_decay(lambda, params[0], params[1])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::linspace;

    #[test]
    fn decay_equals_initial_probability_at_zero_strength() {
        assert_eq!(theoretical_decay(0.0, 1.0, 1.0), 1.0);
        assert_eq!(theoretical_decay(0.0, 0.3, 0.8), 0.8);
    }

    #[test]
    fn decay_is_monotonically_non_increasing() {
        for &(lambda0, p0) in &[(1.0, 1.0), (0.25, 2.0), (5.0, 0.1)] {
            let values: Vec<f64> = linspace(0.0, 3.0, 200)
                .iter()
                .map(|&l| theoretical_decay(l, lambda0, p0))
                .collect();
            assert!(values.windows(2).all(|w| w[1] <= w[0]));
        }
    }

    #[test]
    fn curve_fit_form_matches_closed_form() {
        assert_eq!(decay_model(1.2, &[0.5, 2.0]), theoretical_decay(1.2, 0.5, 2.0));
    }
}
