//! Command-line parsing for the figure generator.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! pipelines: it turns flags into `FigureConfig` / `DecoherenceConfig` and
//! leaves dispatch to `app`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{DecoherenceConfig, FigureConfig, FigureKind, InitialState, SimulationMode};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "fpit", version, about = "FPIT figure generator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// One subcommand per figure, plus `all`.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Decoherence vs constraint strength with a Lindblad simulation and fit.
    Decoherence(DecoherenceArgs),
    /// ANEC violation profile and running integral.
    Anec,
    /// Exotic matter phase diagrams for three potentials.
    PhaseDiagram,
    /// FPIT burst vs binary black hole chirp.
    GwWaveform,
    /// LISA sensitivity vs predicted FPIT strain.
    Lisa,
    /// Monte-Carlo metric rigidity phase diagram.
    MetricRigidity,
    /// Interference of two constraint fields.
    MultiFpit,
    /// Weak-scaling benchmark of the spectral solver.
    Scaling,
    /// Geodesic convergence and metric suppression (figure 1).
    FixedPoint,
    /// Exotic matter profile and g_rr (figure 2).
    Wormhole,
    /// Stabilizer code vs constraint rigidity schematic.
    QeccAnalogy,
    /// Perturbation relaxation below and inside the critical phase.
    WeakCoupling,
    /// Every figure, in catalogue order.
    All(DecoherenceArgs),
}

impl Command {
    /// The figure this command produces; `None` for `all`.
    pub fn kind(&self) -> Option<FigureKind> {
        Some(match self {
            Command::Decoherence(_) => FigureKind::Decoherence,
            Command::Anec => FigureKind::Anec,
            Command::PhaseDiagram => FigureKind::PhaseDiagram,
            Command::GwWaveform => FigureKind::GwWaveform,
            Command::Lisa => FigureKind::Lisa,
            Command::MetricRigidity => FigureKind::MetricRigidity,
            Command::MultiFpit => FigureKind::MultiFpit,
            Command::Scaling => FigureKind::Scaling,
            Command::FixedPoint => FigureKind::FixedPoint,
            Command::Wormhole => FigureKind::Wormhole,
            Command::QeccAnalogy => FigureKind::QeccAnalogy,
            Command::WeakCoupling => FigureKind::WeakCoupling,
            Command::All(_) => return None,
        })
    }

    pub fn decoherence_args(&self) -> Option<&DecoherenceArgs> {
        match self {
            Command::Decoherence(args) | Command::All(args) => Some(args),
            _ => None,
        }
    }
}

/// Flags shared by every subcommand.
#[derive(Debug, Args, Clone)]
pub struct CommonArgs {
    /// Directory the images are written to (created if missing).
    #[arg(long, global = true, env = "FPIT_OUT_DIR", default_value = ".")]
    pub out_dir: PathBuf,

    /// Seed for every random draw (synthetic noise, Monte-Carlo trials, jitter).
    #[arg(long, global = true, default_value_t = 42)]
    pub seed: u64,

    /// Export the computed data as JSON.
    #[arg(long, global = true, value_name = "PATH")]
    pub export_json: Option<PathBuf>,

    /// Export the 1-D series as long-format CSV.
    #[arg(long, global = true, value_name = "PATH")]
    pub export_csv: Option<PathBuf>,

    /// Print an ASCII preview of each figure.
    #[arg(long, global = true)]
    pub preview: bool,

    /// Preview width (columns).
    #[arg(long, global = true, default_value_t = 80)]
    pub preview_width: usize,

    /// Preview height (rows).
    #[arg(long, global = true, default_value_t = 20)]
    pub preview_height: usize,

    /// Debug logging (overrides RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Decoherence sweep overrides.
#[derive(Debug, Args, Clone)]
pub struct DecoherenceArgs {
    /// Lower end of the λ sweep.
    #[arg(long, default_value_t = 0.0)]
    pub lambda_min: f64,

    /// Upper end of the λ sweep.
    #[arg(long, default_value_t = 3.0)]
    pub lambda_max: f64,

    /// Number of λ samples.
    #[arg(long, default_value_t = 100)]
    pub points: usize,

    /// Relative Gaussian noise on the synthetic data.
    #[arg(long, default_value_t = 0.05)]
    pub noise: f64,

    /// Run the Lindblad simulation (auto: when compiled in).
    #[arg(long, value_enum, default_value_t = SimulationMode::Auto)]
    pub simulation: SimulationMode,

    /// Initial state of the two-level system.
    #[arg(long, value_enum, default_value_t = InitialState::Ground)]
    pub initial_state: InitialState,
}

impl Default for DecoherenceArgs {
    fn default() -> Self {
        let d = DecoherenceConfig::default();
        Self {
            lambda_min: d.lambda_min,
            lambda_max: d.lambda_max,
            points: d.points,
            noise: d.noise,
            simulation: d.simulation,
            initial_state: d.initial_state,
        }
    }
}

pub fn figure_config_from_args(args: &CommonArgs) -> FigureConfig {
    FigureConfig {
        out_dir: args.out_dir.clone(),
        seed: args.seed,
        export_json: args.export_json.clone(),
        export_csv: args.export_csv.clone(),
        preview: args.preview,
        preview_width: args.preview_width,
        preview_height: args.preview_height,
    }
}

pub fn decoherence_config_from_args(args: &DecoherenceArgs) -> DecoherenceConfig {
    DecoherenceConfig {
        lambda_min: args.lambda_min,
        lambda_max: args.lambda_max,
        points: args.points,
        noise: args.noise,
        simulation: args.simulation,
        initial_state: args.initial_state,
        ..DecoherenceConfig::default()
    }
}
