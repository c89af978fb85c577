use std::error::Error;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use yee2d_core::{
    environment::PmlConfig,
    grid::Grid2D,
    io::JobConfig,
    simulation::{self, EngineKind, SimulationJob, Verbosity},
    source::{null_source, sine_source},
};

mod export;
mod scenario;

use export::SimulationExport;
use scenario::Scenario;

#[derive(Parser, Debug)]
#[command(name = "yee2d", about = "2D TM-mode FDTD simulation with PML boundaries")]
struct Cli {
    #[command(subcommand)]
    command: Command,
    /// Suppress progress logs (stderr)
    #[arg(long, global = true)]
    quiet: bool,
}

/// Run parameters shared by all subcommands. A TOML config file, when given,
/// replaces the individual flags.
#[derive(Args, Debug, Clone)]
struct JobArgs {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Engine variant: none, berenger or convolutional
    #[arg(long, default_value = "berenger")]
    engine: String,
    /// Number of cells in x direction
    #[arg(long, default_value_t = 100)]
    nx: usize,
    /// Number of cells in y direction
    #[arg(long, default_value_t = 100)]
    ny: usize,
    /// Spatial discretization in x (metres)
    #[arg(long, default_value_t = 0.05)]
    dx: f64,
    /// Spatial discretization in y (metres)
    #[arg(long, default_value_t = 0.05)]
    dy: f64,
    /// Number of time steps
    #[arg(long, default_value_t = 200)]
    nt: usize,
    /// Source x position (default: centre)
    #[arg(long)]
    source_x: Option<usize>,
    /// Source y position (default: centre)
    #[arg(long)]
    source_y: Option<usize>,
    /// PML thickness in cells
    #[arg(long, default_value_t = 10)]
    pml_thickness: usize,
    /// PML target reflection factor R0
    #[arg(long, default_value_t = 1e-6)]
    pml_r0: f64,
    /// PML polynomial grading order
    #[arg(long, default_value_t = 3)]
    pml_grading: u32,
    /// Uniform interior conductivity for the Berenger path (S/m)
    #[arg(long, default_value_t = 0.0)]
    loss: f64,
}

impl JobArgs {
    fn build(&self) -> Result<SimulationJob, Box<dyn Error>> {
        if let Some(path) = &self.config {
            let raw = fs::read_to_string(path)?;
            let config: JobConfig = toml::from_str(&raw)?;
            return Ok(config.into_job()?);
        }

        let grid = Grid2D::new(self.nx, self.ny, self.dx, self.dy);
        let mut job = SimulationJob::new(grid, self.nt, self.engine.parse()?);
        if let (Some(x), Some(y)) = (self.source_x, self.source_y) {
            job.source_point = (x, y);
        }
        job.pml = PmlConfig {
            thickness: self.pml_thickness,
            r0: self.pml_r0,
            grading: self.pml_grading,
        };
        job.loss = self.loss;
        job.validate()?;
        Ok(job)
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one simulation and export the history as JSON
    Run {
        #[command(flatten)]
        job: JobArgs,
        /// Material scenario layered on the environment
        #[arg(long, value_enum, default_value = "free")]
        scenario: Scenario,
        /// Output JSON path (defaults to yee2d-simulation.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Berenger vs convolutional: mid-row cut of the final frame as CSV
    Compare {
        #[command(flatten)]
        job: JobArgs,
        /// CSV output path (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// PML quality check: the same run at 1x and 3x grid size, centre cuts
    Reflect {
        #[command(flatten)]
        job: JobArgs,
        /// CSV output path (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Cut-throughs for a sweep of interior conductivities (Berenger)
    Loss {
        #[command(flatten)]
        job: JobArgs,
        /// Conductivity values to sweep (S/m)
        #[arg(long, num_args = 1.., default_values_t = [0.1, 0.01, 0.001])]
        sigmas: Vec<f64>,
        /// Timestep at which the cut is taken
        #[arg(long, default_value_t = 50)]
        step: usize,
        /// CSV output path (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Time the three engines and the source-call overhead
    Bench {
        #[command(flatten)]
        job: JobArgs,
        /// Repetitions per engine
        #[arg(long, default_value_t = 10)]
        repetitions: usize,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let verbosity = if cli.quiet {
        Verbosity::Quiet
    } else {
        Verbosity::Verbose
    };

    match cli.command {
        Command::Run {
            job,
            scenario,
            output,
        } => run_action(&job, scenario, output.as_deref(), verbosity),
        Command::Compare { job, output } => compare_action(&job, output.as_deref(), verbosity),
        Command::Reflect { job, output } => reflect_action(&job, output.as_deref(), verbosity),
        Command::Loss {
            job,
            sigmas,
            step,
            output,
        } => loss_action(&job, &sigmas, step, output.as_deref(), verbosity),
        Command::Bench { job, repetitions } => bench_action(&job, repetitions),
    }
}

fn run_action(
    args: &JobArgs,
    scenario: Scenario,
    output: Option<&Path>,
    verbosity: Verbosity,
) -> Result<(), Box<dyn Error>> {
    let job = args.build()?;
    let mut env = job.default_environment()?;
    scenario.apply(&mut env);

    let history = simulation::run_with_environment(&job, &env, &sine_source, verbosity)?;

    let default_path = PathBuf::from("yee2d-simulation.json");
    let path = output.unwrap_or(&default_path);
    let export = SimulationExport::new(&job, &history);
    export.write_json(path)?;
    if verbosity == Verbosity::Verbose {
        let bytes = fs::metadata(path)?.len();
        eprintln!(
            "[cli] wrote {} frames to {} ({:.2} MiB)",
            export.nt,
            path.display(),
            bytes as f64 / (1024.0 * 1024.0)
        );
    }
    Ok(())
}

fn compare_action(
    args: &JobArgs,
    output: Option<&Path>,
    verbosity: Verbosity,
) -> Result<(), Box<dyn Error>> {
    let mut berenger_job = args.build()?;
    berenger_job.engine = EngineKind::Berenger;
    let mut cpml_job = berenger_job.clone();
    cpml_job.engine = EngineKind::Convolutional;
    berenger_job.validate()?;
    cpml_job.validate()?;

    // Independent runs share nothing, so they can march in parallel.
    let (berenger, cpml) = rayon::join(
        || simulation::run(&berenger_job, &sine_source, Verbosity::Quiet),
        || simulation::run(&cpml_job, &sine_source, Verbosity::Quiet),
    );
    let (berenger, cpml) = (berenger?, cpml?);

    let iy = berenger_job.grid.ny / 2;
    let t = berenger_job.nt - 1;
    let rows: Vec<[f64; 2]> = berenger
        .row_cut(iy, t)
        .into_iter()
        .zip(cpml.row_cut(iy, t))
        .map(|(b, c)| [b, c])
        .collect();
    emit_csv(output, &["cell", "berenger", "convolutional"], &rows)?;
    if verbosity == Verbosity::Verbose {
        eprintln!("[cli] wrote {} rows (cut at iy={iy}, t={t})", rows.len());
    }
    Ok(())
}

fn reflect_action(
    args: &JobArgs,
    output: Option<&Path>,
    verbosity: Verbosity,
) -> Result<(), Box<dyn Error>> {
    let small_job = args.build()?;
    if !small_job.engine.uses_pml() {
        return Err("reflect needs an absorbing engine (berenger or convolutional)".into());
    }

    // A 3x domain whose boundaries the wave cannot reach in time serves as
    // the reflection-free reference; its centre third overlays the small run.
    let grid = small_job.grid;
    let mut big_job = small_job.clone();
    big_job.grid = Grid2D::new(grid.nx * 3, grid.ny * 3, grid.dx, grid.dy);
    big_job.dt = big_job.grid.courant_dt();
    big_job.source_point = (small_job.source_point.0 * 3, small_job.source_point.1 * 3);
    big_job.validate()?;

    let (small, big) = rayon::join(
        || simulation::run(&small_job, &sine_source, Verbosity::Quiet),
        || simulation::run(&big_job, &sine_source, Verbosity::Quiet),
    );
    let (small, big) = (small?, big?);

    let t = small_job.nt - 1;
    let small_cut = small.col_cut(grid.nx / 2, t);
    let big_cut = big.col_cut(3 * grid.nx / 2, t);
    let rows: Vec<[f64; 2]> = small_cut
        .into_iter()
        .zip(big_cut[grid.ny..2 * grid.ny].iter())
        .map(|(s, &b)| [s, b])
        .collect();
    emit_csv(output, &["cell", "small_with_pml", "large_reference"], &rows)?;
    if verbosity == Verbosity::Verbose {
        eprintln!("[cli] wrote {} rows (final-frame centre cuts)", rows.len());
    }
    Ok(())
}

fn loss_action(
    args: &JobArgs,
    sigmas: &[f64],
    step: usize,
    output: Option<&Path>,
    verbosity: Verbosity,
) -> Result<(), Box<dyn Error>> {
    let base = args.build()?;
    let t = step.min(base.nt - 1);

    let mut cuts = Vec::with_capacity(sigmas.len());
    for &sigma in sigmas {
        let mut job = base.clone();
        job.engine = EngineKind::Berenger;
        job.loss = sigma;
        job.validate()?;
        let history = simulation::run(&job, &sine_source, Verbosity::Quiet)?;
        cuts.push(history.row_cut(base.grid.ny / 2, t));
    }

    let header: Vec<String> = std::iter::once("cell".to_string())
        .chain(sigmas.iter().map(|s| format!("sigma_{s}")))
        .collect();
    let header_refs: Vec<&str> = header.iter().map(String::as_str).collect();
    let rows: Vec<Vec<f64>> = (0..base.grid.nx)
        .map(|ix| cuts.iter().map(|cut| cut[ix]).collect())
        .collect();
    emit_csv(output, &header_refs, &rows)?;
    if verbosity == Verbosity::Verbose {
        eprintln!("[cli] wrote {} rows (cut at t={t})", base.grid.nx);
    }
    Ok(())
}

fn bench_action(args: &JobArgs, repetitions: usize) -> Result<(), Box<dyn Error>> {
    if repetitions == 0 {
        return Err("bench needs at least one repetition".into());
    }
    let base = args.build()?;
    let time_engine = |engine: EngineKind, use_null: bool| -> Result<Vec<f64>, Box<dyn Error>> {
        let mut job = base.clone();
        job.engine = engine;
        job.validate()?;
        let mut times = Vec::with_capacity(repetitions);
        for _ in 0..repetitions {
            let start = Instant::now();
            if use_null {
                simulation::run(&job, &null_source, Verbosity::Quiet)?;
            } else {
                simulation::run(&job, &sine_source, Verbosity::Quiet)?;
            }
            times.push(start.elapsed().as_secs_f64());
        }
        Ok(times)
    };

    let nopml = time_engine(EngineKind::NoPml, false)?;
    let berenger = time_engine(EngineKind::Berenger, false)?;
    let cpml = time_engine(EngineKind::Convolutional, false)?;
    let trivial = time_engine(EngineKind::NoPml, true)?;

    // Everything is reported relative to the fastest no-PML repetition.
    let base_time = stats(&nopml).0;
    for (name, times) in [
        ("noPML", &nopml),
        ("BPML", &berenger),
        ("CPML", &cpml),
        ("trivial", &trivial),
    ] {
        let (min, mean, std) = stats(times);
        println!(
            "{name}: min={:.4} mean={:.4} std={:.4}",
            min / base_time,
            mean / base_time,
            std / base_time
        );
    }
    Ok(())
}

/// Minimum, mean and standard deviation of a sample.
fn stats(times: &[f64]) -> (f64, f64, f64) {
    let min = times.iter().cloned().fold(f64::INFINITY, f64::min);
    let mean = times.iter().sum::<f64>() / times.len() as f64;
    let var = times.iter().map(|t| (t - mean).powi(2)).sum::<f64>() / times.len() as f64;
    (min, mean, var.sqrt())
}

fn emit_csv<R: AsRef<[f64]>>(
    dest: Option<&Path>,
    header: &[&str],
    rows: &[R],
) -> io::Result<()> {
    let mut writer: Box<dyn Write> = match dest {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout())),
    };
    writeln!(writer, "{}", header.join(","))?;
    for (idx, row) in rows.iter().enumerate() {
        write!(writer, "{idx}")?;
        for value in row.as_ref() {
            write!(writer, ",{value}")?;
        }
        writeln!(writer)?;
    }
    Ok(())
}
