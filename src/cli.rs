use crate::build_info;
use crate::error::*;
use crate::grid::*;
use crate::model::*;
use crate::output::*;
use crate::solver::*;
use clap::Parser;
use std::path::PathBuf;

#[cfg(feature = "profile-with-puffin")]
static PUFFIN_SERVER: std::sync::Mutex<Option<puffin_http::Server>> =
    std::sync::Mutex::new(None);

/// awfd forward modeling executable
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Directory for output files, will be created.
    /// WARNING, if this Directory
    /// already exists, current contents will be removed.
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Chunk size to use for parallelism.
    #[arg(short, long, default_value = "1000")]
    pub chunk_size: usize,

    /// The number of rayon threads shared by all workers.
    #[arg(short, long, default_value = "8")]
    pub threads: usize,

    /// Number of workers splitting the grid columns.
    #[arg(short, long, default_value = "2")]
    pub workers: usize,

    /// Grid points in depth.
    #[arg(long, default_value = "200")]
    pub nz: usize,

    /// Grid points across.
    #[arg(long, default_value = "300")]
    pub nx: usize,

    /// Depth spacing in meters.
    #[arg(long, default_value = "10.0")]
    pub dz: f64,

    /// Lateral spacing in meters.
    #[arg(long, default_value = "10.0")]
    pub dx: f64,

    /// Time step in seconds.
    #[arg(long, default_value = "0.001")]
    pub dt: f64,

    /// Number of time steps.
    #[arg(short = 'n', long, default_value = "1000")]
    pub steps: usize,

    /// Half length of the finite difference stencil.
    #[arg(long, default_value = "3")]
    pub order: usize,

    /// Absorbing padding in grid points.
    #[arg(short, long, default_value = "20")]
    pub boundary: usize,

    /// Velocity in m/s, the top layer for layered models.
    #[arg(short, long, default_value = "2000.0")]
    pub velocity: f64,

    /// Peak frequency of the Ricker source in Hz.
    #[arg(short, long, default_value = "15.0")]
    pub frequency: f64,

    /// Source row.
    #[arg(long, default_value = "2")]
    pub source_row: usize,

    /// Source column, the middle column when absent.
    #[arg(long)]
    pub source_column: Option<usize>,

    /// Receiver row.
    #[arg(short, long, default_value = "0")]
    pub receiver_depth: usize,

    /// Relative amplitude of random velocity perturbation.
    #[arg(long, default_value = "0.0")]
    pub perturbation: f64,

    /// Seed for the velocity perturbation.
    #[arg(long, default_value = "0")]
    pub seed: u64,

    /// Write out snapshot images, WARNING: we do not check image size, so be reasonable.
    #[arg(short = 'i', long, requires("output_dir"))]
    pub write_images: bool,

    /// Steps between snapshot images.
    #[arg(long, default_value = "20")]
    pub image_every: usize,

    /// Write the snapshot volume as vtk.
    #[arg(long, requires("output_dir"))]
    pub write_vtk: bool,

    /// Print build information and quit
    #[arg(long)]
    pub build_info: bool,
}

impl Args {
    pub fn simulation_parameters(&self) -> SimulationParameters {
        SimulationParameters {
            order: self.order,
            boundary: self.boundary,
            dz: self.dz,
            dx: self.dx,
            dt: self.dt,
            receiver_depth: self.receiver_depth,
            record_snapshots: self.write_images || self.write_vtk,
            chunk_size: self.chunk_size,
        }
    }

    pub fn cli_setup(name: &str) -> FdResult<Self> {
        let args = Args::parse();

        if args.build_info {
            build_info::print_report(name);
            std::process::exit(0);
        }

        env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or("info"),
        )
        .init();

        if let Some(output_dir) = &args.output_dir {
            let _ = std::fs::remove_dir_all(output_dir);
            ensure_dir_exists(output_dir)?;
        }

        #[cfg(feature = "profile-with-puffin")]
        {
            let server_addr =
                format!("127.0.0.1:{}", puffin_http::DEFAULT_PORT);
            log::info!(
                "Run this to view profiling data:  puffin_viewer {server_addr}"
            );
            let server = puffin_http::Server::new(&server_addr).map_err(|e| {
                FdError::Configuration(format!("profiling server: {e}"))
            })?;
            std::thread::sleep(std::time::Duration::from_secs(2));
            profiling::puffin::set_scopes_on(true);
            profiling::finish_frame!();
            log::info!("profiling clients: {}", server.num_clients());
            if let Ok(mut slot) = PUFFIN_SERVER.lock() {
                *slot = Some(server);
            }
        }

        rayon::ThreadPoolBuilder::new()
            .num_threads(args.threads)
            .thread_name(|i| format!("rayon_thread_{}", i))
            .build_global()
            .map_err(|e| FdError::Configuration(e.to_string()))?;

        Ok(args)
    }

    /// Ricker point source at the configured position.
    pub fn model_input(&self, velocity: Grid2) -> FdResult<ModelInput> {
        let column = self.source_column.unwrap_or(self.nx / 2);
        let delay = 1.0 / self.frequency;
        let wavelet = ricker(self.frequency, delay, self.dt, self.steps);
        let source =
            point_source(self.nz, self.nx, self.source_row, column, &wavelet)?;
        ModelInput::new(velocity, source)
    }

    fn output_path(&self, name: &str) -> Option<PathBuf> {
        self.output_dir.as_ref().map(|dir| dir.join(name))
    }

    /// Write whatever the flags ask for into the output directory.
    pub fn write_output(&self, output: &ForwardOutput) -> FdResult<()> {
        let Some(dir) = self.output_dir.as_ref() else {
            return Ok(());
        };
        if let Some(traces) = &output.traces {
            if let Some(path) = self.output_path("traces.csv") {
                write_traces_csv(traces, &path)?;
            }
            if let Some(path) = self.output_path("traces.bin") {
                write_binary(traces, &path)?;
            }
            if let Some(path) = self.output_path("traces.png") {
                TraceImage::from_traces(traces, traces.max_abs()).write(&path)?;
            }
        }
        if let Some(snapshots) = &output.snapshots {
            if self.write_images {
                let frames = write_frames(snapshots, self.image_every, dir)?;
                log::info!("wrote {frames} frames");
            }
            if self.write_vtk {
                if let Some(path) = self.output_path("snapshots.vtu") {
                    write_vtk_volume(
                        snapshots,
                        [self.dz, self.dx, self.dt],
                        &path,
                    )?;
                }
            }
        }
        Ok(())
    }

    pub fn finish(&self) {
        #[cfg(feature = "profile-with-puffin")]
        {
            log::info!("Flushing profiler");
            if let Ok(mut slot) = PUFFIN_SERVER.lock() {
                slot.take();
            }
        }
    }
}
