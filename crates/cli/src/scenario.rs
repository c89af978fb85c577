//! Canned material scenarios layered on top of a base environment.
//!
//! These only mutate the eps/mu/sigma arrays; the engines never know which
//! scenario produced them. Physical positions are given in metres and mapped
//! onto cells with the grid spacing, so the canonical setups assume the
//! default 5 m x 5 m domain.

use clap::ValueEnum;
use yee2d_core::environment::Environment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Scenario {
    /// Plain vacuum (plus whatever PML the engine asked for).
    #[default]
    Free,
    /// Upper half of the domain lossy with 0.01 S/m.
    HalfLoss,
    /// Conductor corner, diagonal conductor plate and a lossy dielectric
    /// cylinder, a small scattering exercise.
    Workshop,
    /// Luneburg lens centred on the domain, radius a quarter of the
    /// shorter axis.
    Luneburg,
}

impl Scenario {
    pub fn apply(self, env: &mut Environment) {
        match self {
            Scenario::Free => {}
            Scenario::HalfLoss => env.add_loss_half(),
            Scenario::Workshop => workshop(env),
            Scenario::Luneburg => {
                let (nx, ny) = (env.grid.nx, env.grid.ny);
                luneburg(env, nx / 2, ny / 2, nx.min(ny) / 4);
            }
        }
    }
}

/// Perfect-conductor corner, a diagonal plate and a dielectric cylinder with
/// mild loss. Conductors are modelled as enormous magnetic conductivity.
fn workshop(env: &mut Environment) {
    let grid = env.grid;
    let (nx, ny) = (grid.nx, grid.ny);

    // Conductor block in the far corner.
    let (pecx, pecy) = grid.meters_to_cells(2.2, 3.0);
    for ix in nx.saturating_sub(pecx)..nx {
        for iy in ny.saturating_sub(pecy)..ny {
            env.sigma_mx[(ix, iy)] = 1e9;
            env.sigma_my[(ix, iy)] = 1e9;
        }
    }

    // Diagonal plate between (2.1, 1.1) and (1.1, 2.1).
    let (x1, y1) = grid.meters_to_cells(2.1, 1.1);
    let (x2, y2) = grid.meters_to_cells(1.1, 2.1);
    if x1 > x2 {
        for i in 0..x1 - x2 {
            let (ix, iy) = (x2 + i, y2.saturating_sub(i));
            if ix < nx && iy < ny {
                env.sigma_mx[(ix, iy)] = 1e9;
                env.sigma_my[(ix, iy)] = 1e9;
            }
        }
    }

    // Lossy cylinder with four times the vacuum permittivity.
    let (bx, by) = grid.meters_to_cells(1.6, 4.1);
    let (rx, ry) = grid.meters_to_cells(0.5, 0.5);
    let radius = ((rx * rx) as f64 / 2.0 + (ry * ry) as f64 / 2.0).sqrt() as usize;
    for ix in bx.saturating_sub(rx)..(bx + rx).min(nx) {
        for iy in by.saturating_sub(ry)..(by + ry).min(ny) {
            let dx = ix as isize - bx as isize;
            let dy = iy as isize - by as isize;
            let r = ((dx * dx + dy * dy) as f64).sqrt() as usize;
            if r > radius {
                continue;
            }
            env.sigma_mx[(ix, iy)] = 0.01;
            env.sigma_my[(ix, iy)] = 0.01;
            env.eps[(ix, iy)] *= 4.0;
        }
    }
}

/// Grade the permittivity into a Luneburg lens centred on `(cx, cy)` cells
/// with radius `r` cells: eps(r') = eps0 * (2 - (r'/r)^2).
pub fn luneburg(env: &mut Environment, cx: usize, cy: usize, r: usize) {
    let (nx, ny) = (env.grid.nx, env.grid.ny);
    for ix in cx.saturating_sub(r)..(cx + r).min(nx) {
        for iy in cy.saturating_sub(r)..(cy + r).min(ny) {
            let dx = ix as isize - cx as isize;
            let dy = iy as isize - cy as isize;
            let dist = ((dx * dx + dy * dy) as f64).sqrt() as usize;
            if dist > r {
                continue;
            }
            let factor = 2.0 - (dist as f64 / r as f64).powi(2);
            env.eps[(ix, iy)] *= factor;
        }
    }
}
