//! Job-configuration parsing.
//!
//! A run is described by a small TOML file:
//!
//! ```toml
//! engine = "convolutional"
//! nt = 200
//!
//! [grid]
//! nx = 100
//! ny = 100
//! dx = 0.05
//! dy = 0.05
//!
//! [pml]
//! thickness = 10
//! r0 = 1e-6
//! grading = 3
//!
//! [source]
//! x = 50
//! y = 50
//! ```
//!
//! `dt` defaults to the Courant bound for the grid; an explicit `dt` key
//! overrides it (the core does not check the override for stability).

use serde::{Deserialize, Serialize};

use crate::{
    environment::PmlConfig,
    grid::Grid2D,
    simulation::{EngineKind, SetupError, SimulationJob},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    pub grid: Grid2D,
    #[serde(default = "default_nt")]
    pub nt: usize,
    #[serde(default)]
    pub engine: EngineKind,
    /// Explicit time step [s]; Courant bound when absent.
    #[serde(default)]
    pub dt: Option<f64>,
    /// Source cell; grid centre when absent.
    #[serde(default)]
    pub source: Option<SourcePoint>,
    #[serde(default)]
    pub pml: PmlConfig,
    /// Uniform interior conductivity for the Berenger path [S/m].
    #[serde(default)]
    pub loss: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SourcePoint {
    pub x: usize,
    pub y: usize,
}

fn default_nt() -> usize {
    200
}

impl JobConfig {
    pub fn into_job(self) -> Result<SimulationJob, SetupError> {
        let mut job = SimulationJob::new(self.grid, self.nt, self.engine);
        if let Some(dt) = self.dt {
            job.dt = dt;
        }
        if let Some(p) = self.source {
            job.source_point = (p.x, p.y);
        }
        job.pml = self.pml;
        job.loss = self.loss;
        job.validate()?;
        Ok(job)
    }
}
