//! Gravitational-wave waveforms and detector sensitivity.

use std::f64::consts::PI;

use crate::math::chirp_hyperbolic;

/// Quasi-monochromatic FPIT burst: a damped sinusoid.
#[derive(Debug, Clone, Copy)]
pub struct BurstParams {
    /// Carrier frequency (Hz).
    pub frequency: f64,
    /// Amplitude e-folding time (s).
    pub decay_time: f64,
}

impl Default for BurstParams {
    fn default() -> Self {
        Self {
            frequency: 200.0,
            decay_time: 0.01,
        }
    }
}

pub fn fpit_burst(t: f64, p: &BurstParams) -> f64 {
    (2.0 * PI * p.frequency * t).sin() * (-t / p.decay_time).exp()
}

/// Binary black hole inspiral stand-in: hyperbolic chirp with a growing envelope.
#[derive(Debug, Clone, Copy)]
pub struct ChirpParams {
    pub f0: f64,
    pub f1: f64,
    /// Time (s) at which the sweep reaches `f1`.
    pub t1: f64,
    /// Linear envelope growth rate `(1 + k·t)`.
    pub envelope_rate: f64,
}

impl Default for ChirpParams {
    fn default() -> Self {
        Self {
            f0: 50.0,
            f1: 300.0,
            t1: 0.02,
            envelope_rate: 50.0,
        }
    }
}

pub fn bbh_chirp(t: f64, p: &ChirpParams) -> f64 {
    chirp_hyperbolic(t, p.f0, p.t1, p.f1) * (1.0 + t * p.envelope_rate)
}

/// Scale `values` in place so the largest magnitude is 1.
///
/// An all-zero (or empty) signal is left untouched.
pub fn normalize_peak(values: &mut [f64]) {
    let peak = values.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
    if peak > 0.0 && peak.is_finite() {
        for v in values.iter_mut() {
            *v /= peak;
        }
    }
}

/// LISA arm length (m).
pub const LISA_ARM_LENGTH: f64 = 2.5e9;
/// LISA transfer frequency `f* = c / (2πL)` (Hz).
pub const LISA_TRANSFER_FREQUENCY: f64 = 19.09e-3;

/// Single-link optical metrology noise PSD.
pub fn lisa_oms_noise(f: f64) -> f64 {
    2.25e-22 * (1.0 + (2e-3 / f).powi(4))
}

/// Single test-mass acceleration noise PSD.
pub fn lisa_acc_noise(f: f64) -> f64 {
    9e-30 * (1.0 + (0.4e-3 / f).powi(2)) * (1.0 + (f / 8e-3).powi(4))
}

/// Sky-averaged sensitivity `S_n(f)` (Robson, Cornish & Liu 2019, eq. 1, no confusion noise).
pub fn lisa_psd(f: f64) -> f64 {
    let l2 = LISA_ARM_LENGTH * LISA_ARM_LENGTH;
    let transfer = 1.0 + 0.6 * (f / LISA_TRANSFER_FREQUENCY).powi(2);
    10.0 / (3.0 * l2) * (lisa_oms_noise(f) + 4.0 * lisa_acc_noise(f) / (2.0 * PI * f).powi(4)) * transfer
}

/// Amplitude spectral density `√S_n` (strain/√Hz).
pub fn lisa_sensitivity(f: f64) -> f64 {
    lisa_psd(f).sqrt()
}

/// Predicted FPIT signal strain `1e-23 · (f / 1 mHz)^-2.5`.
pub fn fpit_strain(f: f64) -> f64 {
    1e-23 * (f / 1e-3).powf(-2.5)
}
