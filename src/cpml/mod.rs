//! Convolutional perfectly matched layer.
//!
//! Damping profiles ramp up quadratically inside padding regions at the
//! left, right and bottom of the grid. The surface row is left free.
//! Each axis carries two memory variables, one for the staggered first
//! difference and one for the second difference back onto the grid.

mod boundary;
mod memory;
mod profile;

pub use boundary::*;
pub use memory::*;
pub use profile::*;
