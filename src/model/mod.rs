//! Synthetic velocity models and source volumes.

mod source;
mod velocity;

pub use source::*;
pub use velocity::*;
