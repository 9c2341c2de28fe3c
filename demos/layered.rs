use awfd::cli::*;
use awfd::error::*;
use awfd::model::*;
use awfd::par_slice;
use awfd::solver::*;

fn main() -> FdResult<()> {
    let args = Args::cli_setup("layered")?;

    // Three flat layers, faster with depth
    let layers = [
        Layer {
            top: 0,
            velocity: args.velocity,
        },
        Layer {
            top: args.nz / 3,
            velocity: args.velocity * 1.25,
        },
        Layer {
            top: 2 * args.nz / 3,
            velocity: args.velocity * 1.75,
        },
    ];
    let mut velocity =
        layered_velocity(args.nz, args.nx, &layers, args.chunk_size)?;
    if args.perturbation > 0.0 {
        perturb(&mut velocity, args.perturbation, args.seed, args.chunk_size);
    }
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
