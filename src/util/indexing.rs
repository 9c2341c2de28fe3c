//! Linear indexing for grids whose first axis varies fastest.
//! A `z × x` grid stores each depth column contiguously,
//! a `z × x × t` volume stores one `z × x` plane per time step.
use crate::util::*;

pub fn real_buffer_size<const DIMENSION: usize>(dims: &Dims<DIMENSION>) -> usize {
    let mut accumulator = 1;
    for d in dims {
        accumulator *= *d;
    }
    accumulator
}

/// Distance in the linear buffer between neighbours along `axis`.
pub fn axis_stride<const DIMENSION: usize>(
    dims: &Dims<DIMENSION>,
    axis: usize,
) -> usize {
    let mut accumulator = 1;
    for d in 0..axis {
        accumulator *= dims[d];
    }
    accumulator
}

pub fn coord_to_linear<const DIMENSION: usize>(
    coord: &Coord<DIMENSION>,
    dims: &Dims<DIMENSION>,
) -> usize {
    let mut accumulator = 0;
    let mut stride = 1;
    for d in 0..DIMENSION {
        debug_assert!(coord[d] < dims[d]);
        accumulator += coord[d] * stride;
        stride *= dims[d];
    }
    accumulator
}

pub fn linear_to_coord<const DIMENSION: usize>(
    linear_index: usize,
    dims: &Dims<DIMENSION>,
) -> Coord<DIMENSION> {
    let mut result = Coord::zeros();
    let mut index_accumulator = linear_index;
    for d in 0..DIMENSION {
        result[d] = index_accumulator % dims[d];
        index_accumulator /= dims[d];
    }
    result
}
