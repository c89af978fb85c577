//! Material environment: permittivity, permeability and conductivity maps.
//!
//! The evolution engines consume these arrays as-is; no physical-plausibility
//! checks are performed here. The electric conductivities are staggered to
//! match the interior E samples, the magnetic ones are cell-centred:
//!
//! - `sigma_x` (nx-1, ny) — electric loss seen by the interior Ey samples,
//! - `sigma_y` (nx, ny-1) — electric loss seen by the interior Ex samples,
//! - `sigma_mx`, `sigma_my` (nx, ny) — magnetic loss seen by Hz.

use serde::{Deserialize, Serialize};

use crate::{field::Array2, grid::Grid2D, units};

/// Absorbing-layer configuration: thickness in cells, target reflection
/// factor R0 at normal incidence, and polynomial grading order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct PmlConfig {
    pub thickness: usize,
    pub r0: f64,
    pub grading: u32,
}

impl Default for PmlConfig {
    fn default() -> Self {
        Self {
            thickness: 10,
            r0: 1e-6,
            grading: 3,
        }
    }
}

impl PmlConfig {
    /// Peak conductivity σ_max = −ln(R0)·(m+1)·ε₀·c / (2·w·δ) for the
    /// polynomial-graded profile, with δ the diagonal cell size.
    pub fn sigma_max(&self, grid: &Grid2D) -> f64 {
        -self.r0.ln() * (self.grading as f64 + 1.0) * units::EPSILON_0 * units::C
            / (2.0 * self.thickness as f64 * grid.diagonal())
    }
}

#[derive(Debug, Clone)]
pub struct Environment {
    pub grid: Grid2D,
    pub eps: Array2,
    pub mu: Array2,
    pub sigma_x: Array2,
    pub sigma_y: Array2,
    pub sigma_mx: Array2,
    pub sigma_my: Array2,
}

impl Environment {
    /// Uniform vacuum with all conductivities zero.
    pub fn vacuum(grid: Grid2D) -> Self {
        assert!(
            grid.nx > 1 && grid.ny > 1,
            "staggered conductivity arrays need at least two cells per axis"
        );
        Self {
            grid,
            eps: Array2::filled(grid.nx, grid.ny, units::EPSILON_0),
            mu: Array2::filled(grid.nx, grid.ny, units::MU_0),
            sigma_x: Array2::zeros(grid.nx - 1, grid.ny),
            sigma_y: Array2::zeros(grid.nx, grid.ny - 1),
            sigma_mx: Array2::zeros(grid.nx, grid.ny),
            sigma_my: Array2::zeros(grid.nx, grid.ny),
        }
    }

    /// Fill the boundary band of every conductivity array with the
    /// polynomial-graded PML profile. Electric components sit half a cell
    /// closer to the interior than the magnetic ones, hence the half-cell
    /// offset in their normalized depth.
    pub fn apply_pml(&mut self, pml: &PmlConfig) {
        let w = pml.thickness;
        assert!(w >= 1, "PML thickness must be at least one cell");
        assert!(
            2 * w < self.grid.nx.min(self.grid.ny),
            "PML layers may not overlap"
        );
        let sigma_max = pml.sigma_max(&self.grid);
        let m = pml.grading as i32;
        let wf = w as f64;

        for q in 0..w {
            let depth_e = wf + 0.5 - q as f64;
            let depth_m = wf + 1.0 - q as f64;
            let val_e = sigma_max * (depth_e / wf).powi(m);
            let val_m = sigma_max * (depth_m / wf).powi(m);

            fill_row(&mut self.sigma_x, q, val_e);
            fill_row(&mut self.sigma_x, self.grid.nx - 2 - q, val_e);
            fill_col(&mut self.sigma_y, q, val_e);
            fill_col(&mut self.sigma_y, self.grid.ny - 2 - q, val_e);

            fill_row(&mut self.sigma_mx, q, val_m);
            fill_row(&mut self.sigma_mx, self.grid.nx - 1 - q, val_m);
            fill_col(&mut self.sigma_my, q, val_m);
            fill_col(&mut self.sigma_my, self.grid.ny - 1 - q, val_m);
        }
    }

    /// Constant electric conductivity everywhere except a `margin`-cell
    /// border (so an existing PML band is left untouched).
    pub fn add_loss(&mut self, margin: usize, sigma: f64) {
        set_interior(&mut self.sigma_x, margin, sigma);
        set_interior(&mut self.sigma_y, margin, sigma);
    }

    /// Make the upper half of the domain (in y) lossy with 0.01 S/m.
    pub fn add_loss_half(&mut self) {
        let y0 = self.sigma_x.cols() / 2;
        for ix in 0..self.sigma_x.rows() {
            for iy in y0..self.sigma_x.cols() {
                self.sigma_x[(ix, iy)] = 0.01;
            }
        }
        let y0 = self.sigma_y.cols() / 2;
        for ix in 0..self.sigma_y.rows() {
            for iy in y0..self.sigma_y.cols() {
                self.sigma_y[(ix, iy)] = 0.01;
            }
        }
    }

    /// Scale the magnetic conductivities by μ/ε so the layer impedance
    /// matches the adjacent medium (σ_m/μ = σ/ε). Required by the Berenger
    /// split-field formulation.
    pub fn impedance_match_magnetic(&mut self) {
        for ix in 0..self.grid.nx {
            for iy in 0..self.grid.ny {
                let ratio = self.mu[(ix, iy)] / self.eps[(ix, iy)];
                self.sigma_mx[(ix, iy)] *= ratio;
                self.sigma_my[(ix, iy)] *= ratio;
            }
        }
    }
}

fn fill_row(arr: &mut Array2, ix: usize, value: f64) {
    for iy in 0..arr.cols() {
        arr[(ix, iy)] = value;
    }
}

fn fill_col(arr: &mut Array2, iy: usize, value: f64) {
    for ix in 0..arr.rows() {
        arr[(ix, iy)] = value;
    }
}

fn set_interior(arr: &mut Array2, margin: usize, value: f64) {
    if 2 * margin >= arr.rows() || 2 * margin >= arr.cols() {
        return;
    }
    for ix in margin..arr.rows() - margin {
        for iy in margin..arr.cols() - margin {
            arr[(ix, iy)] = value;
        }
    }
}
