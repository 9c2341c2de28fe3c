//! Centred finite-difference stencils.
//!
//! Weights come from the Taylor consistency conditions of a given order
//! and grid staggering, and are applied along any axis of a grid.

mod coefficients;
mod difference;

pub use coefficients::*;
pub use difference::*;
