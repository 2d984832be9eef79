//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - produced by the figure pipelines in-memory
//! - handed to the renderers and the terminal preview
//! - exported to JSON/CSV alongside the rendered image

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Every figure the tool can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FigureKind {
    Decoherence,
    Anec,
    PhaseDiagram,
    GwWaveform,
    Lisa,
    MetricRigidity,
    MultiFpit,
    Scaling,
    FixedPoint,
    Wormhole,
    QeccAnalogy,
    WeakCoupling,
}

impl FigureKind {
    pub const ALL: [FigureKind; 12] = [
        FigureKind::Decoherence,
        FigureKind::Anec,
        FigureKind::PhaseDiagram,
        FigureKind::GwWaveform,
        FigureKind::Lisa,
        FigureKind::MetricRigidity,
        FigureKind::MultiFpit,
        FigureKind::Scaling,
        FigureKind::FixedPoint,
        FigureKind::Wormhole,
        FigureKind::QeccAnalogy,
        FigureKind::WeakCoupling,
    ];

    /// Stable identifier (matches the subcommand name).
    pub fn slug(self) -> &'static str {
        match self {
            FigureKind::Decoherence => "decoherence",
            FigureKind::Anec => "anec",
            FigureKind::PhaseDiagram => "phase-diagram",
            FigureKind::GwWaveform => "gw-waveform",
            FigureKind::Lisa => "lisa",
            FigureKind::MetricRigidity => "metric-rigidity",
            FigureKind::MultiFpit => "multi-fpit",
            FigureKind::Scaling => "scaling",
            FigureKind::FixedPoint => "fixed-point",
            FigureKind::Wormhole => "wormhole",
            FigureKind::QeccAnalogy => "qecc-analogy",
            FigureKind::WeakCoupling => "weak-coupling",
        }
    }

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            FigureKind::Decoherence => "Decoherence vs constraint strength",
            FigureKind::Anec => "ANEC violation profile",
            FigureKind::PhaseDiagram => "Exotic matter phase diagram",
            FigureKind::GwWaveform => "Gravitational waveform comparison",
            FigureKind::Lisa => "LISA sensitivity",
            FigureKind::MetricRigidity => "Metric rigidity phase diagram",
            FigureKind::MultiFpit => "Multi-FPIT interference",
            FigureKind::Scaling => "Weak scaling benchmark",
            FigureKind::FixedPoint => "Fixed point dynamics",
            FigureKind::Wormhole => "Wormhole dynamics",
            FigureKind::QeccAnalogy => "QECC analogy",
            FigureKind::WeakCoupling => "Weak coupling vs critical phase",
        }
    }
}

/// Whether the decoherence sweep should run the open-system simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SimulationMode {
    /// Simulate when the capability is compiled in, otherwise warn and continue
    /// with synthetic data only.
    Auto,
    /// Require the simulation; fail if it is unavailable.
    On,
    /// Synthetic data only.
    Off,
}

/// Initial two-level state for the Lindblad evolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum InitialState {
    /// `|0⟩⟨0|`: populations are untouched by pure dephasing.
    Ground,
    /// `|+⟩⟨+|`: the projector overlap decays as coherence is lost.
    Plus,
}

/// A named 1-D sampled series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Series {
    pub label: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl Series {
    pub fn new(label: impl Into<String>, x: Vec<f64>, y: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            x,
            y,
        }
    }

    /// Zip into `(x, y)` pairs.
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.x.iter().copied().zip(self.y.iter().copied()).collect()
    }

    pub fn len(&self) -> usize {
        self.x.len().min(self.y.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A scalar field sampled on a tensor grid; `z[j][i]` is the value at `(x[i], y[j])`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field2d {
    pub label: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<Vec<f64>>,
}

impl Field2d {
    /// Finite `(min, max)` of `z`, if any value is finite.
    pub fn z_range(&self) -> Option<(f64, f64)> {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for v in self.z.iter().flatten().copied().filter(|v| v.is_finite()) {
            lo = lo.min(v);
            hi = hi.max(v);
        }
        (lo <= hi).then_some((lo, hi))
    }
}

/// Everything a pipeline computed, independent of how it is drawn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FigureData {
    pub figure: FigureKind,
    pub series: Vec<Series>,
    pub fields: Vec<Field2d>,
    /// Named scalar results (fitted parameters, counts, ...).
    pub scalars: Vec<(String, f64)>,
}

impl FigureData {
    pub fn new(figure: FigureKind) -> Self {
        Self {
            figure,
            series: Vec::new(),
            fields: Vec::new(),
            scalars: Vec::new(),
        }
    }

    pub fn scalar(&self, name: &str) -> Option<f64> {
        self.scalars.iter().find(|(k, _)| k == name).map(|(_, v)| *v)
    }
}

/// Envelope written by `--export-json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FigureExport {
    pub tool: String,
    pub figure: String,
    pub generated_at: DateTime<Utc>,
    pub images: Vec<PathBuf>,
    pub data: FigureData,
}

/// What a single figure run produced.
#[derive(Debug, Clone)]
pub struct FigureOutput {
    pub figure: FigureKind,
    pub images: Vec<PathBuf>,
    pub data: FigureData,
}

/// Run configuration shared by every figure.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct FigureConfig {
    pub out_dir: PathBuf,
    pub seed: u64,
    pub export_json: Option<PathBuf>,
    pub export_csv: Option<PathBuf>,
    pub preview: bool,
    pub preview_width: usize,
    pub preview_height: usize,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("."),
            seed: 42,
            export_json: None,
            export_csv: None,
            preview: false,
            preview_width: 80,
            preview_height: 20,
        }
    }
}

/// Decoherence sweep parameters.
#[derive(Debug, Clone)]
pub struct DecoherenceConfig {
    pub lambda_min: f64,
    pub lambda_max: f64,
    pub points: usize,
    /// Generating decay scale `λ0` of the closed-form model.
    pub lambda0: f64,
    /// Generating initial probability `P0` of the closed-form model.
    pub p0: f64,
    /// Relative Gaussian noise on the synthetic data.
    pub noise: f64,
    /// Position of the critical-strength marker.
    pub lambda_crit: f64,
    pub simulation: SimulationMode,
    pub initial_state: InitialState,
    /// Evolution window `[0, t_final]` sampled at `t_points` times.
    pub t_final: f64,
    pub t_points: usize,
    /// Internal RK4 step budget per sample.
    pub max_steps: usize,
}

impl Default for DecoherenceConfig {
    fn default() -> Self {
        Self {
            lambda_min: 0.0,
            lambda_max: 3.0,
            points: 100,
            lambda0: 1.0,
            p0: 1.0,
            noise: 0.05,
            lambda_crit: 1.0,
            simulation: SimulationMode::Auto,
            initial_state: InitialState::Ground,
            t_final: 10.0,
            t_points: 100,
            max_steps: 100_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_are_unique() {
        let mut slugs: Vec<&str> = FigureKind::ALL.iter().map(|f| f.slug()).collect();
        slugs.sort();
        slugs.dedup();
        assert_eq!(slugs.len(), FigureKind::ALL.len());
    }

    #[test]
    fn field_range_skips_non_finite() {
        let field = Field2d {
            label: "f".to_string(),
            x: vec![0.0, 1.0],
            y: vec![0.0],
            z: vec![vec![f64::NAN, 2.0], vec![-1.0, f64::INFINITY]],
        };
        assert_eq!(field.z_range(), Some((-1.0, 2.0)));
    }
}
