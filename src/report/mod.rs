//! Terminal reporting: saved-image lines and per-figure summaries.

pub mod format;

pub use format::*;
