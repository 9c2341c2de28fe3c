use awfd::cli::*;
use awfd::error::*;
use awfd::model::*;
use awfd::par_slice;
use awfd::solver::*;

fn main() -> FdResult<()> {
    let args = Args::cli_setup("homogeneous")?;

    let velocity =
        homogeneous_velocity(args.nz, args.nx, args.velocity, args.chunk_size);
    let input = args.model_input(velocity)?;

    let output = run_forward_model(
        args.workers,
        &args.simulation_parameters(),
        &input,
    )?;
    if let Some(traces) = &output.traces {
        let energy = par_slice::sum_of_squares(traces.buffer(), args.chunk_size);
        log::info!("trace energy {energy:.6e}");
    }
    args.write_output(&output)?;
    args.finish();
    Ok(())
}
