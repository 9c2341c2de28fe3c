use crate::error::*;
use crate::stencil::*;

/// Forward modeling is configurable.
/// These are all the parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationParameters {
    /// Half length of the staggered stencil.
    pub order: usize,

    /// Padding width in grid points at the left, right and bottom.
    pub boundary: usize,

    /// Depth spacing.
    pub dz: f64,

    /// Lateral spacing.
    pub dx: f64,

    /// Time step.
    pub dt: f64,

    /// Row holding the receivers, one per column.
    pub receiver_depth: usize,

    /// Keep the whole pressure field of every step.
    pub record_snapshots: bool,

    /// Some multithreaded operations on vectors are chunked with this size
    pub chunk_size: usize,
}

impl std::default::Default for SimulationParameters {
    fn default() -> Self {
        SimulationParameters {
            order: 3,
            boundary: 20,
            dz: 10.0,
            dx: 10.0,
            dt: 1e-3,
            receiver_depth: 0,
            record_snapshots: false,
            chunk_size: 1000,
        }
    }
}

impl SimulationParameters {
    /// Columns borrowed from each neighbour every step.
    pub fn halo_width(&self) -> usize {
        2 * self.order - 1
    }

    /// Check the parameters against a `nz × nx` grid.
    pub fn validate(&self, nz: usize, nx: usize) -> FdResult<()> {
        if self.order == 0 {
            return Err(FdError::InvalidArgument(
                "order must be at least 1".to_string(),
            ));
        }
        for (name, value) in [("dz", self.dz), ("dx", self.dx), ("dt", self.dt)]
        {
            if !(value.is_finite() && value > 0.0) {
                return Err(FdError::InvalidArgument(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if 2 * self.boundary >= nz.min(nx) {
            return Err(FdError::InvalidArgument(format!(
                "padding of {} points does not fit a {nz} x {nx} grid",
                self.boundary
            )));
        }
        if self.receiver_depth >= nz {
            return Err(FdError::InvalidArgument(format!(
                "receiver row {} is below the {nz} row grid",
                self.receiver_depth
            )));
        }
        if self.chunk_size == 0 {
            return Err(FdError::InvalidArgument(
                "chunk size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// `v_max · dt · sqrt(1/dx² + 1/dz²) · Σ|c|`, stable up to 1.
    pub fn courant_number(
        &self,
        max_velocity: f64,
        coefficients: &StencilCoefficients,
    ) -> f64 {
        let inverse = (1.0 / (self.dx * self.dx) + 1.0 / (self.dz * self.dz))
            .sqrt();
        max_velocity * self.dt * inverse * coefficients.abs_sum()
    }
}
