//! `fpit-figures` library crate.
//!
//! The binary (`fpit`) is a thin wrapper around this library so that:
//!
//! - every figure pipeline is testable without spawning processes
//! - the numerical models can be reused outside the figure renderers
//! - code stays easy to navigate as the catalogue grows

pub mod app;
pub mod cli;
pub mod decoherence;
pub mod domain;
pub mod error;
pub mod figures;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
