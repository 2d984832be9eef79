//! Scalar constraint fields and their stress-energy proxies.

use std::f64::consts::PI;

use crate::math::gradient;

/// Gaussian scalar field `φ(r) = φ0 · exp(-r² / 2σ²)`.
pub fn gaussian_field(r: f64, phi0: f64, sigma: f64) -> f64 {
    phi0 * (-(r * r) / (2.0 * sigma * sigma)).exp()
}

/// Radial derivative `dφ/dr = -φ(r) · r / σ²`.
pub fn gaussian_field_derivative(r: f64, phi0: f64, sigma: f64) -> f64 {
    -gaussian_field(r, phi0, sigma) * r / (sigma * sigma)
}

/// Exotic energy density `-(λ/8π) · (φ'² - ½(φ'² + φ²))` for the Gaussian field.
pub fn anec_energy_density(r: f64, phi0: f64, sigma: f64, lambda: f64) -> f64 {
    let phi = gaussian_field(r, phi0, sigma);
    let dphi = gaussian_field_derivative(r, phi0, sigma);
    -(lambda / (8.0 * PI)) * (dphi * dphi - 0.5 * (dphi * dphi + phi * phi))
}

/// Centres of the two interfering constraint fields.
pub const MULTI_FPIT_CENTERS: (f64, f64) = (5.0, -5.0);

/// Combined `C_tt` of two Gaussian constraint fields centred at `x = ±5`.
///
/// The cross term is suppressed by `exp(-λ|σ1 - σ2|)`, so identical widths
/// interfere fully.
pub fn multi_fpit_constraint(x: f64, sigma1: f64, sigma2: f64, lambda: f64) -> f64 {
    let (c1, c2) = MULTI_FPIT_CENTERS;
    let phi1 = (-(x - c1).powi(2) / (2.0 * sigma1 * sigma1)).exp();
    let phi2 = (-(x - c2).powi(2) / (2.0 * sigma2 * sigma2)).exp();
    lambda * (phi1 * phi1 + phi2 * phi2 + 2.0 * phi1 * phi2 * (-lambda * (sigma1 - sigma2).abs()).exp())
}

/// Self-interaction potentials for the phase diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Potential {
    Gaussian,
    Quartic,
    Hyperbolic,
}

impl Potential {
    pub const ALL: [Potential; 3] = [Potential::Gaussian, Potential::Quartic, Potential::Hyperbolic];

    pub fn display_name(self) -> &'static str {
        match self {
            Potential::Gaussian => "Gaussian",
            Potential::Quartic => "Quartic",
            Potential::Hyperbolic => "Hyperbolic",
        }
    }

    /// Lower-case name used in output file names.
    pub fn slug(self) -> &'static str {
        match self {
            Potential::Gaussian => "gaussian",
            Potential::Quartic => "quartic",
            Potential::Hyperbolic => "hyperbolic",
        }
    }

    /// `V(φ)` at width `σ`.
    pub fn eval(self, phi: f64, sigma: f64) -> f64 {
        match self {
            Potential::Gaussian => (-(phi * phi) / (2.0 * sigma * sigma)).exp(),
            Potential::Quartic => phi.powi(4) / sigma.powi(4) - phi * phi / (sigma * sigma),
            Potential::Hyperbolic => (phi / sigma).cosh() - 1.0,
        }
    }
}

/// `T_exotic = -λ (½ V'² - V)` given `V` and its derivative sampled on one grid.
pub fn exotic_stress_energy(v: &[f64], dv: &[f64], lambda: f64) -> Vec<f64> {
    v.iter()
        .zip(dv.iter())
        .map(|(&vi, &dvi)| -lambda * (0.5 * dvi * dvi - vi))
        .collect()
}

/// Stress-energy rows for every `λ` in `lambdas`, with `V'` taken numerically
/// over `phi_grid`. Row `j` belongs to `lambdas[j]`.
pub fn phase_diagram(potential: Potential, phi_grid: &[f64], lambdas: &[f64], sigma: f64) -> Vec<Vec<f64>> {
    let v: Vec<f64> = phi_grid.iter().map(|&p| potential.eval(p, sigma)).collect();
    let dv = gradient(&v, phi_grid);
    lambdas
        .iter()
        .map(|&lambda| exotic_stress_energy(&v, &dv, lambda))
        .collect()
}

/// Radial exotic-matter density `-1/(8π) · 1/(r² + 1)` supporting the throat.
pub fn exotic_matter_profile(r: f64) -> f64 {
    -1.0 / (8.0 * PI) * (1.0 / (r * r + 1.0))
}
