use crate::comm::*;
use crate::decomposition::*;
use crate::error::*;
use crate::grid::*;
use crate::solver::*;
use crate::stencil::*;
use crate::util::*;

/// Global inputs, held by the root worker only.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelInput {
    /// `nz × nx`
    pub velocity: Grid2,
    /// `nz × nx × nt`
    pub source: Grid3,
}

impl ModelInput {
    pub fn new(velocity: Grid2, source: Grid3) -> FdResult<Self> {
        let input = ModelInput { velocity, source };
        input.check()?;
        Ok(input)
    }

    pub fn nz(&self) -> usize {
        self.velocity.extent(0)
    }

    pub fn nx(&self) -> usize {
        self.velocity.extent(1)
    }

    pub fn nt(&self) -> usize {
        self.source.extent(2)
    }

    fn check(&self) -> FdResult<()> {
        let expected = vector![self.nz(), self.nx(), self.nt()];
        if *self.source.dims() != expected {
            return Err(FdError::shape_mismatch(
                expected.as_slice(),
                self.source.dims().as_slice(),
            ));
        }
        if let Some(v) = self
            .velocity
            .buffer()
            .iter()
            .find(|v| !(v.is_finite() && **v >= 0.0))
        {
            return Err(FdError::InvalidArgument(format!(
                "velocity must be finite and non-negative, found {v}"
            )));
        }
        Ok(())
    }
}

/// What a worker hands back. Only the root carries gathered output.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardOutput {
    pub rank: usize,
    /// `nx × nt`
    pub traces: Option<Grid2>,
    /// `nz × nx × nt`, when snapshots are recorded.
    pub snapshots: Option<Grid3>,
}

/// One worker's part of a distributed forward model.
///
/// The root passes the global input, every other worker passes `None`.
/// Shapes are broadcast, the model is scattered by column blocks, each
/// worker marches its block in time and the output is gathered back on
/// the root.
pub fn forward_model<C: Communicator>(
    comm: &C,
    params: &SimulationParameters,
    input: Option<&ModelInput>,
) -> FdResult<ForwardOutput> {
    profiling::scope!("forward_model");
    let root_input = if comm.is_root() {
        let input = input.ok_or_else(|| {
            FdError::InvalidArgument(
                "root worker needs the model input".to_string(),
            )
        })?;
        input.check()?;
        Some(input)
    } else {
        None
    };

    let shape = root_input
        .map(|i| vec![i.nz() as f64, i.nx() as f64, i.nt() as f64]);
    let shape = comm.broadcast(ROOT, shape.as_deref(), 3)?;
    let (nz, nx, nt) = (shape[0] as usize, shape[1] as usize, shape[2] as usize);

    let decomposition = Decomposition::new(nx, comm.size(), comm.rank())?;
    params.validate(nz, nx)?;
    let coefficients =
        StencilCoefficients::solve(params.order, GridType::Staggered)?;
    decomposition.check_halo(coefficients.halo_width())?;

    if let Some(input) = root_input {
        let max_velocity = input.velocity.max_abs();
        let courant = params.courant_number(max_velocity, &coefficients);
        log::info!(
            "{nz} x {nx} grid, {nt} steps, {} workers, courant number {courant:.3}",
            comm.size()
        );
        if courant > 1.0 {
            log::warn!(
                "courant number {courant:.3} exceeds 1, the run is likely unstable"
            );
        }
    }

    let local = decomposition.local();
    let velocity = comm.scatterv(
        ROOT,
        root_input.map(|i| i.velocity.buffer()),
        &decomposition.band_counts(nz),
        &decomposition.band_displacements(nz),
    )?;
    let velocity = Grid::from_vec(vector![nz, local.count], velocity)?;
    let source = scatter_planes(
        comm,
        &decomposition,
        nz,
        nt,
        root_input.map(|i| i.source.buffer()),
    )?;
    let source = Grid::from_vec(vector![nz, local.count, nt], source)?;

    let mut stepper = WaveStepper::new(
        params.clone(),
        coefficients,
        decomposition.clone(),
        velocity,
        source,
    )?;
    stepper.run(comm)?;
    let (traces, snapshots) = stepper.into_output();

    let traces = gather_traces(comm, &decomposition, &traces)?;
    let snapshots = match snapshots {
        Some(local) => gather_snapshots(comm, &decomposition, &local)?,
        None => None,
    };
    Ok(ForwardOutput {
        rank: comm.rank(),
        traces,
        snapshots,
    })
}

/// Run [`forward_model`] on `workers` workers and return the root's output.
pub fn run_forward_model(
    workers: usize,
    params: &SimulationParameters,
    input: &ModelInput,
) -> FdResult<ForwardOutput> {
    let outputs = launch(workers, |comm| {
        forward_model(&comm, params, comm.is_root().then_some(input))
    })?;
    outputs.into_iter().nth(ROOT).ok_or_else(|| {
        FdError::Configuration("no root worker in the run".to_string())
    })
}
