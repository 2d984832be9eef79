//! Figure pipelines.
//!
//! Each module owns one figure: it computes a typed dataset, renders it to
//! SVG through [`crate::plot`], and returns a [`FigureOutput`] carrying the
//! image paths and the exportable data.

pub mod anec;
pub mod decoherence;
pub mod fixed_point;
pub mod gw_waveform;
pub mod lisa;
pub mod metric_rigidity;
pub mod multi_fpit;
pub mod phase_diagram;
pub mod qecc;
pub mod scaling;
pub mod weak_coupling;
pub mod wormhole;

use tracing::{debug, info_span};

use crate::domain::{DecoherenceConfig, FigureConfig, FigureKind, FigureOutput};
use crate::error::AppError;

/// Produce one figure into `cfg.out_dir`.
pub fn generate(kind: FigureKind, cfg: &FigureConfig, deco: &DecoherenceConfig) -> Result<FigureOutput, AppError> {
    let span = info_span!("figure", name = kind.slug());
    let _guard = span.enter();
    debug!(out_dir = %cfg.out_dir.display(), seed = cfg.seed, "Generating");

    match kind {
        FigureKind::Decoherence => decoherence::run(cfg, deco),
        FigureKind::Anec => anec::run(cfg),
        FigureKind::PhaseDiagram => phase_diagram::run(cfg),
        FigureKind::GwWaveform => gw_waveform::run(cfg),
        FigureKind::Lisa => lisa::run(cfg),
        FigureKind::MetricRigidity => metric_rigidity::run(cfg),
        FigureKind::MultiFpit => multi_fpit::run(cfg),
        FigureKind::Scaling => scaling::run(cfg),
        FigureKind::FixedPoint => fixed_point::run(cfg),
        FigureKind::Wormhole => wormhole::run(cfg),
        FigureKind::QeccAnalogy => qecc::run(cfg),
        FigureKind::WeakCoupling => weak_coupling::run(cfg),
    }
}
