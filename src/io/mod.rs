//! Output helpers.
//!
//! - long-format CSV export of a figure's series (`export`)
//! - JSON export envelope (`json`)

pub mod export;
pub mod json;

pub use export::*;
pub use json::*;
