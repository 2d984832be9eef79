//! Domain types used throughout the figure pipelines.
//!
//! This module defines:
//!
//! - the figure catalogue (`FigureKind`)
//! - sampled data containers (`Series`, `Field2d`, `FigureData`)
//! - run configuration (`FigureConfig`, `DecoherenceConfig`)

pub mod types;

pub use types::*;
