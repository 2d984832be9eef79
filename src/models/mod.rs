//! Physical models evaluated by the figure pipelines.
//!
//! Models are implemented as small, pure functions of a coordinate and a few
//! constants so that grid evaluation and fitting code can stay generic.

pub mod decay;
pub mod field;
pub mod gw;
pub mod metric;
pub mod scaling;

pub use decay::*;
pub use field::*;
pub use gw::*;
pub use metric::*;
pub use scaling::*;
