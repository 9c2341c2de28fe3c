use crate::error::*;
use crate::grid::*;
use rayon::prelude::*;

/// Target amplitude of a wave reflected off the padding region.
pub const REFLECTION_COEFFICIENT: f64 = 1e-6;

/// Damping at padding depth `u` for local velocity `v`
/// in a padding region of physical width `width`.
#[inline]
pub fn damping_value(u: f64, v: f64, width: f64) -> f64 {
    let d0 = -(3.0 * v) / (2.0 * width) * REFLECTION_COEFFICIENT.ln();
    let ratio = u / width;
    d0 * ratio * ratio
}

/// Quadratic damping profile for paired depth and velocity grids.
pub fn damp_profile<const GRID_DIMENSION: usize>(
    u: &Grid<GRID_DIMENSION>,
    v: &Grid<GRID_DIMENSION>,
    width: f64,
) -> FdResult<Grid<GRID_DIMENSION>> {
    u.check_same_shape(v)?;
    if !(width.is_finite() && width > 0.0) {
        return Err(FdError::InvalidArgument(format!(
            "padding width must be positive, got {width}"
        )));
    }
    let mut result = Grid::zeros(*u.dims());
    result
        .buffer_mut()
        .par_iter_mut()
        .zip(u.buffer().par_iter().zip(v.buffer().par_iter()))
        .for_each(|(d, (u, v))| *d = damping_value(*u, *v, width));
    Ok(result)
}

/// Per step decay `exp(-damping * dt)` of the memory variables.
pub fn decay_factor<const GRID_DIMENSION: usize>(
    damping: &Grid<GRID_DIMENSION>,
    dt: f64,
) -> Grid<GRID_DIMENSION> {
    let mut result = damping.clone();
    result
        .buffer_mut()
        .par_iter_mut()
        .for_each(|d| *d = (-*d * dt).exp());
    result
}
