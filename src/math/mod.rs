//! Numerical primitives shared by the figure pipelines.
//!
//! - sampling grids (`grid`)
//! - finite differences and running integrals (`calculus`)
//! - RK4 time integration (`ode`)
//! - swept-frequency signals (`signal`)
//! - linear and nonlinear least squares (`ols`, `curve_fit`)

pub mod calculus;
pub mod curve_fit;
pub mod grid;
pub mod ode;
pub mod ols;
pub mod signal;

pub use calculus::*;
pub use curve_fit::*;
pub use grid::*;
pub use ode::*;
pub use ols::*;
pub use signal::*;
