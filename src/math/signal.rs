//! Swept-frequency signals.

use std::f64::consts::PI;

/// Hyperbolic frequency sweep: `f(t) = f0·f1·t1 / ((f0 - f1)·t + f1·t1)`.
///
/// Starts at `f0` when `t = 0` and reaches `f1` at `t = t1`. Returns
/// `cos(phase(t))`, so the first sample is always `1`.
pub fn chirp_hyperbolic(t: f64, f0: f64, t1: f64, f1: f64) -> f64 {
    chirp_hyperbolic_phase(t, f0, t1, f1).cos()
}

/// Instantaneous phase (radians) of [`chirp_hyperbolic`].
pub fn chirp_hyperbolic_phase(t: f64, f0: f64, t1: f64, f1: f64) -> f64 {
    if f0 == f1 {
        return 2.0 * PI * f0 * t;
    }
    // Time at which the sweep frequency would diverge.
    let singular = -f1 * t1 / (f0 - f1);
    2.0 * PI * (-singular * f0) * (1.0 - t / singular).abs().ln()
}

/// Instantaneous frequency (Hz) of the hyperbolic sweep.
pub fn chirp_hyperbolic_frequency(t: f64, f0: f64, t1: f64, f1: f64) -> f64 {
    f0 * f1 * t1 / ((f0 - f1) * t + f1 * t1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chirp_starts_at_unit_amplitude() {
        assert!((chirp_hyperbolic(0.0, 50.0, 0.02, 300.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn frequency_hits_both_ends() {
        assert!((chirp_hyperbolic_frequency(0.0, 50.0, 0.02, 300.0) - 50.0).abs() < 1e-9);
        assert!((chirp_hyperbolic_frequency(0.02, 50.0, 0.02, 300.0) - 300.0).abs() < 1e-9);
    }

    #[test]
    fn phase_derivative_matches_frequency() {
        let (f0, t1, f1) = (50.0, 0.02, 300.0);
        let t = 0.011;
        let dt = 1e-7;
        let dphase = chirp_hyperbolic_phase(t + dt, f0, t1, f1) - chirp_hyperbolic_phase(t - dt, f0, t1, f1);
        let f_numeric = dphase / (2.0 * dt) / (2.0 * PI);
        let f_exact = chirp_hyperbolic_frequency(t, f0, t1, f1);
        assert!((f_numeric - f_exact).abs() / f_exact < 1e-6);
    }

    #[test]
    fn equal_frequencies_degrade_to_a_tone() {
        let v = chirp_hyperbolic(0.25, 2.0, 1.0, 2.0);
        assert!((v - (PI).cos()).abs() < 1e-12);
    }
}
