//! Metric components, geodesics and perturbation models.

use nalgebra::Vector2;
use rand::Rng;
use rand_distr::StandardNormal;

use crate::math::laplacian_reflect;

/// Radial component of the Morris–Thorne wormhole metric `g_rr = 1 / (1 - b0/r)`.
///
/// The component is singular at the throat `r = b0`; `None` is returned for
/// every `r ≤ b0` so callers cannot sample inside the excluded radius.
pub fn wormhole_grr(r: f64, b0: f64) -> Option<f64> {
    if !(r > b0) {
        return None;
    }
    Some(1.0 / (1.0 - b0 / r))
}

/// Constrained `h_tt`: a Gaussian bump with the fixed point at the origin carved out.
pub fn metric_suppression(x: f64, t: f64) -> f64 {
    let s = x * x + t * t;
    let h_tt = 0.5 * (-s).exp();
    h_tt * (1.0 - (-s / 0.5).exp())
}

/// Geodesic deviation toward the fixed point: `ẋ = v`, `v̇ = -λ0 · x · e^{-x²}`.
pub fn geodesic_rhs(lambda0: f64) -> impl Fn(f64, &Vector2<f64>) -> Vector2<f64> {
    move |_t, y| {
        let (x, v) = (y[0], y[1]);
        Vector2::new(v, -lambda0 * x * (-x * x).exp())
    }
}

/// Coupling regimes of the rigidity phase diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RigidityRegime {
    /// `λ < 1`: large perturbations survive.
    Weak,
    /// `1 ≤ λ ≤ 1.5`: perturbations are exponentially damped.
    Critical,
    /// `λ > 1.5`: topological locking at a small floor.
    Strong,
}

impl RigidityRegime {
    pub fn classify(lambda: f64) -> Self {
        if lambda < 1.0 {
            RigidityRegime::Weak
        } else if lambda <= 1.5 {
            RigidityRegime::Critical
        } else {
            RigidityRegime::Strong
        }
    }

    /// Standard deviation of the measurement noise in this regime.
    pub fn noise_level(self) -> f64 {
        match self {
            RigidityRegime::Weak => 0.02,
            RigidityRegime::Critical => 0.001,
            RigidityRegime::Strong => 0.0001,
        }
    }
}

/// Base metric perturbation `Δh_tt(λ)` with the regime's intrinsic scatter.
pub fn rigidity_perturbation<R: Rng + ?Sized>(lambda: f64, rng: &mut R) -> f64 {
    match RigidityRegime::classify(lambda) {
        RigidityRegime::Weak => {
            let z: f64 = rng.sample(StandardNormal);
            0.1 * (1.0 + 0.2 * z)
        }
        RigidityRegime::Critical => 1e-3 * (-8.0 * (lambda - 1.0)).exp(),
        RigidityRegime::Strong => {
            let z: f64 = rng.sample(StandardNormal);
            1e-4 * (1.0 + 0.1 * z)
        }
    }
}

/// Parameters of the weak-coupling relaxation experiment.
#[derive(Debug, Clone)]
pub struct RelaxationParams {
    pub sigma: f64,
    pub phi0: f64,
    /// Grid points on `[-5σ, 5σ]`.
    pub n: usize,
    pub dt: f64,
    pub steps: usize,
}

impl Default for RelaxationParams {
    fn default() -> Self {
        Self {
            sigma: 1.0,
            phi0: 1.0,
            n: 100,
            dt: 0.01,
            steps: 1000,
        }
    }
}

/// Evolve `∂h/∂t = -Γh + λφ²∇²h` with explicit Euler steps.
///
/// `Γ = √λ · φ0² / σ`, `φ = φ0·e^{-x²/σ²}` and `h(0) = 0.1·e^{-x²/(2σ)²}`.
/// Returns the grid and the final perturbation.
pub fn relax_perturbation(lambda: f64, params: &RelaxationParams) -> (Vec<f64>, Vec<f64>) {
    let sigma = params.sigma;
    let x = crate::math::linspace(-5.0 * sigma, 5.0 * sigma, params.n);
    let phi_sq: Vec<f64> = x
        .iter()
        .map(|&xi| {
            let phi = params.phi0 * (-(xi * xi) / (sigma * sigma)).exp();
            phi * phi
        })
        .collect();
    let mut h: Vec<f64> = x
        .iter()
        .map(|&xi| 0.1 * (-(xi * xi) / (2.0 * sigma).powi(2)).exp())
        .collect();

    let gamma = lambda.sqrt() * params.phi0 * params.phi0 / sigma;

    for _ in 0..params.steps {
        let lap = laplacian_reflect(&h);
        for i in 0..h.len() {
            h[i] += params.dt * (-gamma * h[i] + lambda * phi_sq[i] * lap[i]);
        }
    }

    (x, h)
}
