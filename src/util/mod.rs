pub mod indexing;
pub use indexing::*;
pub use nalgebra::vector;

/// Grid coordinate, first entry is the fastest varying axis.
pub type Coord<const GRID_DIMENSION: usize> =
    nalgebra::SVector<usize, { GRID_DIMENSION }>;

/// Per axis extents of a grid.
pub type Dims<const GRID_DIMENSION: usize> =
    nalgebra::SVector<usize, { GRID_DIMENSION }>;
