//! JSON export of a finished run for web visualization.
//!
//! Frames are stored time-major as |Hz| values together with the grid and
//! source metadata, so a viewer can animate `data[frame][ix][iy]` directly.

use std::{fs::File, io::BufWriter, path::Path};

use serde::Serialize;
use yee2d_core::{history::History, simulation::SimulationJob};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationExport {
    pub nx: usize,
    pub ny: usize,
    pub nt: usize,
    pub max_value: f64,
    pub dx: f64,
    pub dy: f64,
    pub dt: f64,
    pub source_point: [usize; 2],
    pub pml_type: String,
    pub data: Vec<Vec<Vec<f64>>>,
}

impl SimulationExport {
    pub fn new(job: &SimulationJob, history: &History) -> Self {
        let (nx, ny, nt) = history.shape();
        Self {
            nx,
            ny,
            nt,
            max_value: history.max_abs(),
            dx: job.grid.dx,
            dy: job.grid.dy,
            dt: job.dt,
            source_point: [job.source_point.0, job.source_point.1],
            pml_type: job.engine.identifier().to_string(),
            data: history.abs_frames(),
        }
    }

    pub fn write_json(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(writer, self)?;
        Ok(())
    }
}
