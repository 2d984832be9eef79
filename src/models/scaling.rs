//! Complexity scaling of the spectral constraint solver.

use rand::Rng;

/// Expected runtime `a · N² · ln N` of an `N × N` spectral solve.
pub fn theoretical_scaling(n: f64, a: f64) -> f64 {
    a * n * n * n.ln()
}

/// Default prefactor of [`theoretical_scaling`].
pub const SCALING_PREFACTOR: f64 = 1e-6;

/// Grid sizes of the weak-scaling benchmark.
pub const BENCHMARK_SIZES: [f64; 4] = [32.0, 64.0, 128.0, 256.0];

/// "Measured" runtimes: the theoretical law jittered by `U(0.9, 1.1)`.
pub fn jittered_runtimes<R: Rng + ?Sized>(sizes: &[f64], a: f64, rng: &mut R) -> Vec<f64> {
    sizes
        .iter()
        .map(|&n| theoretical_scaling(n, a) * rng.gen_range(0.9..1.1))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn scaling_quadruples_plus_log_on_doubling() {
        let a = theoretical_scaling(64.0, SCALING_PREFACTOR);
        let b = theoretical_scaling(128.0, SCALING_PREFACTOR);
        let expected = 4.0 * 128f64.ln() / 64f64.ln();
        assert!((b / a - expected).abs() < 1e-12);
    }

    #[test]
    fn jitter_stays_within_ten_percent_and_is_seeded() {
        let mut rng = StdRng::seed_from_u64(42);
        let a = jittered_runtimes(&BENCHMARK_SIZES, SCALING_PREFACTOR, &mut rng);
        for (&n, &t) in BENCHMARK_SIZES.iter().zip(a.iter()) {
            let ratio = t / theoretical_scaling(n, SCALING_PREFACTOR);
            assert!((0.9..1.1).contains(&ratio));
        }

        let mut rng = StdRng::seed_from_u64(42);
        let b = jittered_runtimes(&BENCHMARK_SIZES, SCALING_PREFACTOR, &mut rng);
        assert_eq!(a, b);
    }
}
