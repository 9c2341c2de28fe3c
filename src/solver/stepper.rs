use crate::comm::*;
use crate::cpml::*;
use crate::decomposition::*;
use crate::error::*;
use crate::grid::*;
use crate::halo::*;
use crate::solver::*;
use crate::stencil::*;
use crate::util::*;
use rayon::prelude::*;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StepperState {
    Uninitialized,
    Ready,
    /// Number of completed steps.
    Stepping(usize),
    Finished,
}

/// Leapfrog time marching of one worker's column block.
///
/// Every step borrows `2N - 1` pressure columns from each neighbour,
/// differences twice along each axis with the memory variables folded
/// in after each difference, and advances
/// `next = (v dt)² (Pz + Px) + 2 current - previous + source(t)`.
pub struct WaveStepper {
    params: SimulationParameters,
    coefficients: StencilCoefficients,
    decomposition: Decomposition,
    nz: usize,
    nt: usize,
    velocity: Grid2,
    source: Grid3,
    state: StepperState,
    boundary: Option<CpmlBoundary>,
    memory: CpmlMemory,
    velocity_dt2: Grid2,
    previous: Grid2,
    current: Grid2,
    traces: Grid2,
    snapshots: Option<Grid3>,
}

impl WaveStepper {
    /// `velocity` is `nz × c` and `source` is `nz × c × nt`
    /// for the worker's `c` columns.
    pub fn new(
        params: SimulationParameters,
        coefficients: StencilCoefficients,
        decomposition: Decomposition,
        velocity: Grid2,
        source: Grid3,
    ) -> FdResult<Self> {
        let nz = velocity.extent(0);
        let c = decomposition.local().count;
        let nt = source.extent(2);
        if velocity.extent(1) != c {
            return Err(FdError::shape_mismatch(
                &[nz, c],
                velocity.dims().as_slice(),
            ));
        }
        if *source.dims() != vector![nz, c, nt] {
            return Err(FdError::shape_mismatch(
                &[nz, c, nt],
                source.dims().as_slice(),
            ));
        }
        if coefficients.order() != params.order {
            return Err(FdError::InvalidArgument(format!(
                "{} coefficients for order {}",
                coefficients.order(),
                params.order
            )));
        }
        params.validate(nz, decomposition.nx())?;
        let h = coefficients.halo_width();
        let snapshots = params
            .record_snapshots
            .then(|| Grid::zeros(vector![nz, c, nt]));
        Ok(WaveStepper {
            memory: CpmlMemory::zeros(nz, c, h),
            velocity_dt2: Grid::zeros(vector![nz, c]),
            previous: Grid::zeros(vector![nz, c]),
            current: Grid::zeros(vector![nz, c]),
            traces: Grid::zeros(vector![c, nt]),
            snapshots,
            params,
            coefficients,
            decomposition,
            nz,
            nt,
            velocity,
            source,
            state: StepperState::Uninitialized,
            boundary: None,
        })
    }

    pub fn state(&self) -> StepperState {
        self.state
    }

    pub fn steps(&self) -> usize {
        self.nt
    }

    /// Pressure after the last completed step.
    pub fn pressure(&self) -> &Grid2 {
        &self.current
    }

    fn geometry(&self) -> BoundaryGeometry {
        let p = self.decomposition.local();
        BoundaryGeometry {
            nz: self.nz,
            nx: self.decomposition.nx(),
            offset: p.offset,
            count: p.count,
            order: self.coefficients.order(),
            boundary: self.params.boundary,
            dz: self.params.dz,
            dx: self.params.dx,
        }
    }

    /// Build the damping and zero the wavefield and memory.
    pub fn initialize<C: Communicator>(&mut self, comm: &C) -> FdResult<()> {
        profiling::scope!("WaveStepper::initialize");
        if self.state != StepperState::Uninitialized {
            return Err(FdError::InvalidArgument(format!(
                "cannot initialize a stepper in state {:?}",
                self.state
            )));
        }
        let h = self.coefficients.halo_width();
        let velocity_halo =
            HaloExchange::new(&self.decomposition, h, HaloFill::ReplicateEdge);
        let extended = velocity_halo.extend(comm, &self.velocity)?;
        self.boundary = Some(CpmlBoundary::build(
            &self.geometry(),
            &extended,
            self.params.dt,
        )?);

        let dt = self.params.dt;
        self.velocity_dt2 = self.velocity.clone();
        crate::par_slice::map_in_place(
            self.velocity_dt2.buffer_mut(),
            |v| (v * dt) * (v * dt),
            self.params.chunk_size,
        );
        self.memory.reset();
        crate::par_slice::set_value(
            self.previous.buffer_mut(),
            0.0,
            self.params.chunk_size,
        );
        crate::par_slice::set_value(
            self.current.buffer_mut(),
            0.0,
            self.params.chunk_size,
        );
        self.state = if self.nt == 0 {
            StepperState::Finished
        } else {
            StepperState::Ready
        };
        log::debug!(
            "worker {}: ready for {} steps",
            self.decomposition.rank(),
            self.nt
        );
        Ok(())
    }

    /// Advance one time step.
    pub fn step<C: Communicator>(&mut self, comm: &C) -> FdResult<()> {
        profiling::scope!("WaveStepper::step");
        let t = match self.state {
            StepperState::Ready => 0,
            StepperState::Stepping(t) => t,
            state => {
                return Err(FdError::InvalidArgument(format!(
                    "cannot step a stepper in state {state:?}"
                )))
            }
        };
        let Some(boundary) = self.boundary.as_ref() else {
            return Err(FdError::InvalidArgument(
                "stepper has no boundary".to_string(),
            ));
        };
        log::trace!("worker {}: step {t}", self.decomposition.rank());

        let w = self.coefficients.weights();
        let h = self.coefficients.halo_width();
        let chunk_size = self.params.chunk_size;
        let memory = &mut self.memory;

        let pz = {
            profiling::scope!("z axis");
            let padded = self.current.pad_rows(h);
            let mut first = difference(&padded, w, self.params.dz, 0)?;
            absorb(&mut memory.phi_z, &boundary.z_half, &mut first, chunk_size)?;
            let mut second = difference(&first, w, self.params.dz, 0)?;
            absorb(&mut memory.psi_z, &boundary.z_full, &mut second, chunk_size)?;
            second
        };

        let px = {
            profiling::scope!("x axis");
            let halo = HaloExchange::new(&self.decomposition, h, HaloFill::Zero);
            let extended = halo.extend(comm, &self.current)?;
            let mut first = difference(&extended, w, self.params.dx, 1)?;
            absorb(&mut memory.phi_x, &boundary.x_half, &mut first, chunk_size)?;
            let mut second = difference(&first, w, self.params.dx, 1)?;
            absorb(&mut memory.psi_x, &boundary.x_full, &mut second, chunk_size)?;
            second
        };

        {
            profiling::scope!("leapfrog");
            let source = self.source.plane(t);
            self.previous
                .buffer_mut()
                .par_chunks_mut(chunk_size)
                .zip(self.current.buffer().par_chunks(chunk_size))
                .zip(self.velocity_dt2.buffer().par_chunks(chunk_size))
                .zip(pz.buffer().par_chunks(chunk_size))
                .zip(px.buffer().par_chunks(chunk_size))
                .zip(source.par_chunks(chunk_size))
                .for_each(|(((((prev, cur), vdt2), pz), px), s)| {
                    for i in 0..prev.len() {
                        prev[i] = vdt2[i] * (pz[i] + px[i]) + 2.0 * cur[i]
                            - prev[i]
                            + s[i];
                    }
                });
        }
        std::mem::swap(&mut self.previous, &mut self.current);
        self.record(t);

        self.state = if t + 1 == self.nt {
            StepperState::Finished
        } else {
            StepperState::Stepping(t + 1)
        };
        Ok(())
    }

    fn record(&mut self, t: usize) {
        let c = self.current.extent(1);
        let depth = self.params.receiver_depth;
        for j in 0..c {
            let value = self.current.get(&vector![depth, j]);
            self.traces.set(&vector![j, t], value);
        }
        if let Some(snapshots) = self.snapshots.as_mut() {
            snapshots.plane_mut(t).copy_from_slice(self.current.buffer());
        }
    }

    /// Initialize if needed and step until finished.
    pub fn run<C: Communicator>(&mut self, comm: &C) -> FdResult<()> {
        if self.state == StepperState::Uninitialized {
            self.initialize(comm)?;
        }
        while self.state != StepperState::Finished {
            self.step(comm)?;
        }
        Ok(())
    }

    /// Local `c × nt` traces and, if recorded, `nz × c × nt` snapshots.
    pub fn into_output(self) -> (Grid2, Option<Grid3>) {
        (self.traces, self.snapshots)
    }
}
