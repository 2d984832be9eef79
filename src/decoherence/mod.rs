//! Decoherence vs constraint strength.
//!
//! The sweep always produces closed-form synthetic data. When the Lindblad
//! capability is compiled in (cargo feature `lindblad`) it also simulates a
//! dephasing two-level system per λ. The decay law is fitted to the synthetic
//! data and residuals are reported for both datasets.

#[cfg(feature = "lindblad")]
pub mod lindblad;
pub mod provider;
pub mod sweep;

pub use provider::{SimulationProvider, SyntheticProvider, select_provider, simulation_available};
#[cfg(feature = "lindblad")]
pub use provider::LindbladProvider;
pub use sweep::{DecoherenceSweep, run_sweep};
