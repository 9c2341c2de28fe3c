use crate::error::*;
use crate::grid::*;
use crate::util::*;
use std::f64::consts::PI;

/// Ricker wavelet of peak `frequency`, centred `delay` seconds in.
pub fn ricker(frequency: f64, delay: f64, dt: f64, nt: usize) -> Vec<f64> {
    (0..nt)
        .map(|t| {
            let tau = t as f64 * dt - delay;
            let a = (PI * frequency * tau).powi(2);
            (1.0 - 2.0 * a) * (-a).exp()
        })
        .collect()
}

/// `nz × nx × nt` source volume firing `wavelet` at one grid point.
pub fn point_source(
    nz: usize,
    nx: usize,
    row: usize,
    column: usize,
    wavelet: &[f64],
) -> FdResult<Grid3> {
    if row >= nz || column >= nx {
        return Err(FdError::InvalidArgument(format!(
            "source at ({row}, {column}) is outside the {nz} x {nx} grid"
        )));
    }
    let mut source = Grid::zeros(vector![nz, nx, wavelet.len()]);
    for (t, w) in wavelet.iter().enumerate() {
        source.set(&vector![row, column, t], *w);
    }
    Ok(source)
}
