//! High-level run orchestration: validation, environment assembly,
//! coefficient derivation and engine dispatch.

use std::{fmt, str::FromStr, time::Instant};

use serde::{Deserialize, Serialize};

use crate::{
    berenger::{self, BerengerCoefficients, SplitHz},
    cpml::{self, CpmlCoefficients, CpmlRecursion, PsiFields},
    environment::{Environment, PmlConfig},
    field::FieldSet,
    grid::Grid2D,
    history::History,
    no_pml::{self, NoPmlCoefficients},
    source::Source,
};

/// Which time-marching algorithm handles the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// Bare leapfrog; the domain edge reflects.
    #[serde(rename = "none")]
    NoPml,
    /// Berenger split-field PML.
    #[default]
    Berenger,
    /// Convolutional PML (recursive convolution).
    Convolutional,
}

impl EngineKind {
    pub fn identifier(self) -> &'static str {
        match self {
            EngineKind::NoPml => "none",
            EngineKind::Berenger => "berenger",
            EngineKind::Convolutional => "convolutional",
        }
    }

    pub fn uses_pml(self) -> bool {
        !matches!(self, EngineKind::NoPml)
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

impl FromStr for EngineKind {
    type Err = SetupError;

    fn from_str(s: &str) -> Result<Self, SetupError> {
        match s {
            "none" => Ok(EngineKind::NoPml),
            "berenger" => Ok(EngineKind::Berenger),
            "convolutional" => Ok(EngineKind::Convolutional),
            other => Err(SetupError::UnknownEngine(other.to_string())),
        }
    }
}

/// Configuration faults caught before any stepping. Numerical instability
/// (a dt above the Courant bound, non-finite conductivities) is a documented
/// precondition violation and is not detected here.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("unknown engine variant '{0}' (expected none, berenger or convolutional)")]
    UnknownEngine(String),

    #[error("grid must be at least 2x2 cells, got {nx}x{ny}")]
    GridTooSmall { nx: usize, ny: usize },

    #[error("time axis is empty (nt = 0)")]
    EmptyTimeAxis,

    #[error("time step must be positive, got {0}")]
    NonPositiveDt(f64),

    #[error("source point ({x}, {y}) outside the {nx}x{ny} Hz grid")]
    SourceOutOfRange {
        x: usize,
        y: usize,
        nx: usize,
        ny: usize,
    },

    #[error("PML thickness {thickness} does not fit a {nx}x{ny} grid")]
    PmlTooThick {
        thickness: usize,
        nx: usize,
        ny: usize,
    },
}

/// Everything one run needs besides the environment and the source.
#[derive(Debug, Clone)]
pub struct SimulationJob {
    pub grid: Grid2D,
    pub nt: usize,
    pub dt: f64,
    pub source_point: (usize, usize),
    pub pml: PmlConfig,
    pub engine: EngineKind,
    /// Uniform interior conductivity added on the Berenger path [S/m].
    pub loss: f64,
}

impl SimulationJob {
    /// Job with the Courant time step, a centred source and default PML.
    pub fn new(grid: Grid2D, nt: usize, engine: EngineKind) -> Self {
        Self {
            grid,
            nt,
            dt: grid.courant_dt(),
            source_point: (grid.nx / 2, grid.ny / 2),
            pml: PmlConfig::default(),
            engine,
            loss: 0.0,
        }
    }

    pub fn validate(&self) -> Result<(), SetupError> {
        if self.grid.nx < 2 || self.grid.ny < 2 {
            return Err(SetupError::GridTooSmall {
                nx: self.grid.nx,
                ny: self.grid.ny,
            });
        }
        if self.nt == 0 {
            return Err(SetupError::EmptyTimeAxis);
        }
        if !(self.dt > 0.0) {
            return Err(SetupError::NonPositiveDt(self.dt));
        }
        let (sx, sy) = self.source_point;
        if sx >= self.grid.nx || sy >= self.grid.ny {
            return Err(SetupError::SourceOutOfRange {
                x: sx,
                y: sy,
                nx: self.grid.nx,
                ny: self.grid.ny,
            });
        }
        if self.engine.uses_pml() {
            let w = self.pml.thickness;
            if w == 0 || 2 * w >= self.grid.nx.min(self.grid.ny) {
                return Err(SetupError::PmlTooThick {
                    thickness: w,
                    nx: self.grid.nx,
                    ny: self.grid.ny,
                });
            }
        }
        Ok(())
    }

    /// Standard environment for this job's engine: vacuum everywhere, a
    /// graded PML band for the absorbing variants, and on the Berenger path
    /// the uniform interior loss plus impedance-matched magnetic
    /// conductivities.
    pub fn default_environment(&self) -> Result<Environment, SetupError> {
        self.validate()?;
        let mut env = Environment::vacuum(self.grid);
        match self.engine {
            EngineKind::NoPml => {}
            EngineKind::Berenger => {
                env.apply_pml(&self.pml);
                env.add_loss(self.pml.thickness, self.loss);
                env.impedance_match_magnetic();
            }
            EngineKind::Convolutional => {
                env.apply_pml(&self.pml);
            }
        }
        Ok(env)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Verbose,
}

impl Verbosity {
    fn enabled(self) -> bool {
        matches!(self, Verbosity::Verbose)
    }
}

/// Run the job against its standard environment.
pub fn run<S: Source + ?Sized>(
    job: &SimulationJob,
    source: &S,
    verbosity: Verbosity,
) -> Result<History, SetupError> {
    let env = job.default_environment()?;
    run_with_environment(job, &env, source, verbosity)
}

/// Run the job against a caller-built environment (obstacles, lenses,
/// custom loss maps). The environment arrays must match the job's grid.
pub fn run_with_environment<S: Source + ?Sized>(
    job: &SimulationJob,
    env: &Environment,
    source: &S,
    verbosity: Verbosity,
) -> Result<History, SetupError> {
    job.validate()?;
    assert_eq!(
        env.eps.shape(),
        (job.grid.nx, job.grid.ny),
        "environment does not match the job grid"
    );

    if verbosity.enabled() {
        eprintln!(
            "[setup] engine={} grid={}x{} nt={} dt={:.3e} source=({},{})",
            job.engine,
            job.grid.nx,
            job.grid.ny,
            job.nt,
            job.dt,
            job.source_point.0,
            job.source_point.1
        );
        if job.engine.uses_pml() {
            eprintln!(
                "[setup] pml thickness={} r0={:.1e} grading={}",
                job.pml.thickness, job.pml.r0, job.pml.grading
            );
        }
    }

    let mut fields = FieldSet::zeros(job.grid);
    let mut history = History::zeros(job.grid, job.nt);
    let (dx, dy, dt) = (job.grid.dx, job.grid.dy, job.dt);

    let start = Instant::now();
    match job.engine {
        EngineKind::NoPml => {
            let coeffs = NoPmlCoefficients::derive(dx, dy, dt);
            no_pml::evolve(
                job.nt,
                &mut fields,
                &coeffs,
                &mut history,
                job.source_point,
                source,
            );
        }
        EngineKind::Berenger => {
            let coeffs = BerengerCoefficients::derive(env, dx, dy, dt);
            let mut split = SplitHz::zeros(job.grid.nx, job.grid.ny);
            berenger::evolve(
                job.nt,
                &mut fields,
                &mut split,
                &coeffs,
                &mut history,
                job.source_point,
                source,
            );
        }
        EngineKind::Convolutional => {
            let coeffs = CpmlCoefficients::derive(env, dx, dy, dt);
            let recursion = CpmlRecursion::derive(env, dx, dy, dt);
            let mut psi = PsiFields::zeros(job.grid.nx, job.grid.ny);
            cpml::evolve(
                job.nt,
                &mut fields,
                &mut psi,
                &coeffs,
                &recursion,
                &mut history,
                job.source_point,
                source,
            );
        }
    }

    if verbosity.enabled() {
        eprintln!(
            "[run] {} steps in {:.2?} (max |Hz| = {:.3e})",
            job.nt,
            start.elapsed(),
            history.max_abs()
        );
    }

    Ok(history)
}
