//! Splitting grid columns across workers.
//!
//! Depth is never split, so a worker owns a contiguous range of
//! columns over the whole depth, and each time plane of a volume holds
//! one contiguous run per worker.

mod layout;
mod partition;

pub use layout::*;
pub use partition::*;
