//! Distributed 2-D acoustic wave modeling.
//!
//! A velocity model and a source volume are split by columns across
//! cooperating workers, each worker marches the pressure field of its
//! block with staggered finite differences and a convolutional PML,
//! and receiver traces and snapshots are gathered back on the root.

pub mod build_info;
pub mod cli;
pub mod comm;
pub mod cpml;
pub mod decomposition;
pub mod error;
pub mod grid;
pub mod halo;
pub mod model;
pub mod output;
pub mod par_slice;
pub mod solver;
pub mod stencil;
pub mod util;
