//! Figure rendering.
//!
//! - `svg`: shared plotters helpers for the SVG figures
//! - `style`: fonts, palette, colour map
//! - `ascii`: terminal preview

pub mod ascii;
pub mod style;
pub mod svg;

pub use ascii::render_ascii_preview;
pub use svg::*;
