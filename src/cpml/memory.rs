use crate::error::*;
use crate::grid::*;
use crate::util::*;
use rayon::prelude::*;

/// Convolutional memory of one worker, persisting across time steps.
///
/// `phi` follows the first difference of the pressure, `psi` the second.
#[derive(Debug, Clone, PartialEq)]
pub struct CpmlMemory {
    /// `(nz + h) × c`
    pub phi_z: Grid2,
    /// `nz × c`
    pub psi_z: Grid2,
    /// `nz × (c + h)`
    pub phi_x: Grid2,
    /// `nz × c`
    pub psi_x: Grid2,
}

impl CpmlMemory {
    pub fn zeros(nz: usize, count: usize, halo_width: usize) -> Self {
        CpmlMemory {
            phi_z: Grid::zeros(vector![nz + halo_width, count]),
            psi_z: Grid::zeros(vector![nz, count]),
            phi_x: Grid::zeros(vector![nz, count + halo_width]),
            psi_x: Grid::zeros(vector![nz, count]),
        }
    }

    pub fn reset(&mut self) {
        for g in [
            &mut self.phi_z,
            &mut self.psi_z,
            &mut self.phi_x,
            &mut self.psi_x,
        ] {
            g.buffer_mut().fill(0.0);
        }
    }
}

/// Advance `memory ← b·memory + (b − 1)·derivative`
/// and fold it into the derivative, `derivative ← derivative + memory`.
pub fn absorb(
    memory: &mut Grid2,
    decay: &Grid2,
    derivative: &mut Grid2,
    chunk_size: usize,
) -> FdResult<()> {
    profiling::scope!("cpml::absorb");
    memory.check_same_shape(decay)?;
    memory.check_same_shape(derivative)?;
    let chunk_size = chunk_size.max(1);
    memory
        .buffer_mut()
        .par_chunks_mut(chunk_size)
        .zip(decay.buffer().par_chunks(chunk_size))
        .zip(derivative.buffer_mut().par_chunks_mut(chunk_size))
        .for_each(|((m_chunk, b_chunk), d_chunk)| {
            for ((m, b), d) in
                m_chunk.iter_mut().zip(b_chunk.iter()).zip(d_chunk.iter_mut())
            {
                *m = b * *m + (b - 1.0) * *d;
                *d += *m;
            }
        });
    Ok(())
}
