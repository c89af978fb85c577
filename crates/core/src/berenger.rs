//! Berenger split-field PML engine.
//!
//! Hz is carried as two per-cell components hzx and hzy whose sum is the
//! physical field; each component is damped independently by the magnetic
//! conductivity of its own axis. The update coefficients come from a
//! second-order implicit-loss discretization, so a lossy cell decays with
//! the exact exponential factor (2ε−σdt)/(2ε+σdt) per step.

use crate::{
    environment::Environment,
    field::{Array2, FieldSet},
    history::History,
    source::Source,
};

/// Per-cell update coefficients. The electric ones are staggered like the
/// interior E samples they scale; ε is averaged over the two adjacent cells
/// to land on those positions.
#[derive(Debug, Clone)]
pub struct BerengerCoefficients {
    /// (nx, ny-1): decay and curl factors for the interior Ex samples.
    pub ex1: Array2,
    pub ex2: Array2,
    /// (nx-1, ny): decay and curl factors for the interior Ey samples.
    pub ey1: Array2,
    pub ey2: Array2,
    /// (nx, ny): decay and curl factors for the hzx split component.
    pub hzx1: Array2,
    pub hzx2: Array2,
    /// (nx, ny): decay and curl factors for the hzy split component.
    pub hzy1: Array2,
    pub hzy2: Array2,
}

impl BerengerCoefficients {
    pub fn derive(env: &Environment, dx: f64, dy: f64, dt: f64) -> Self {
        let eps_y = env.eps.average_cols(); // (nx, ny-1), Ex positions
        let eps_x = env.eps.average_rows(); // (nx-1, ny), Ey positions
        let (nx, ny) = (env.grid.nx, env.grid.ny);

        let mut ex1 = Array2::zeros(nx, ny - 1);
        let mut ex2 = Array2::zeros(nx, ny - 1);
        for ix in 0..nx {
            for iy in 0..ny - 1 {
                let e = eps_y[(ix, iy)];
                let s = env.sigma_y[(ix, iy)];
                ex1[(ix, iy)] = (2.0 * e - s * dt) / (2.0 * e + s * dt);
                ex2[(ix, iy)] = (2.0 * dt) / (2.0 * e + s * dt) / dy;
            }
        }

        let mut ey1 = Array2::zeros(nx - 1, ny);
        let mut ey2 = Array2::zeros(nx - 1, ny);
        for ix in 0..nx - 1 {
            for iy in 0..ny {
                let e = eps_x[(ix, iy)];
                let s = env.sigma_x[(ix, iy)];
                ey1[(ix, iy)] = (2.0 * e - s * dt) / (2.0 * e + s * dt);
                ey2[(ix, iy)] = (2.0 * dt) / (2.0 * e + s * dt) / dx;
            }
        }

        let mut hzx1 = Array2::zeros(nx, ny);
        let mut hzx2 = Array2::zeros(nx, ny);
        let mut hzy1 = Array2::zeros(nx, ny);
        let mut hzy2 = Array2::zeros(nx, ny);
        for ix in 0..nx {
            for iy in 0..ny {
                let m = env.mu[(ix, iy)];
                let smx = env.sigma_mx[(ix, iy)];
                let smy = env.sigma_my[(ix, iy)];
                hzx1[(ix, iy)] = (2.0 * m - smx * dt) / (2.0 * m + smx * dt);
                hzx2[(ix, iy)] = (2.0 * dt) / (2.0 * m + smx * dt) / dx;
                hzy1[(ix, iy)] = (2.0 * m - smy * dt) / (2.0 * m + smy * dt);
                hzy2[(ix, iy)] = (2.0 * dt) / (2.0 * m + smy * dt) / dy;
            }
        }

        Self {
            ex1,
            ex2,
            ey1,
            ey2,
            hzx1,
            hzx2,
            hzy1,
            hzy2,
        }
    }
}

/// The two split Hz components. Their sum is the physical field.
#[derive(Debug, Clone)]
pub struct SplitHz {
    pub hzx: Array2,
    pub hzy: Array2,
}

impl SplitHz {
    pub fn zeros(nx: usize, ny: usize) -> Self {
        Self {
            hzx: Array2::zeros(nx, ny),
            hzy: Array2::zeros(nx, ny),
        }
    }
}

/// March `nt` split-field steps.
///
/// The hard source overwrites the recombined Hz only; hzx and hzy keep their
/// pre-source values, so on the next step their sum will differ from the
/// overwritten field. That asymmetry is part of the algorithm's observable
/// behaviour and is kept as-is.
pub fn evolve<S: Source + ?Sized>(
    nt: usize,
    fields: &mut FieldSet,
    split: &mut SplitHz,
    c: &BerengerCoefficients,
    history: &mut History,
    source_point: (usize, usize),
    source: &S,
) {
    let (nx, ny) = fields.hz.shape();

    for t in 0..nt {
        for ix in 0..nx {
            for iy in 0..ny {
                let curl_ey = fields.ey[(ix + 1, iy)] - fields.ey[(ix, iy)];
                let curl_ex = fields.ex[(ix, iy + 1)] - fields.ex[(ix, iy)];
                split.hzx[(ix, iy)] =
                    c.hzx1[(ix, iy)] * split.hzx[(ix, iy)] - c.hzx2[(ix, iy)] * curl_ey;
                split.hzy[(ix, iy)] =
                    c.hzy1[(ix, iy)] * split.hzy[(ix, iy)] + c.hzy2[(ix, iy)] * curl_ex;
                fields.hz[(ix, iy)] = split.hzx[(ix, iy)] + split.hzy[(ix, iy)];
            }
        }

        fields.hz[source_point] = source.sample(t);

        for ix in 0..nx {
            for iy in 0..ny - 1 {
                let dhz = fields.hz[(ix, iy + 1)] - fields.hz[(ix, iy)];
                fields.ex[(ix, iy + 1)] =
                    c.ex1[(ix, iy)] * fields.ex[(ix, iy + 1)] + c.ex2[(ix, iy)] * dhz;
            }
        }
        for ix in 0..nx - 1 {
            for iy in 0..ny {
                let dhz = fields.hz[(ix + 1, iy)] - fields.hz[(ix, iy)];
                fields.ey[(ix + 1, iy)] =
                    c.ey1[(ix, iy)] * fields.ey[(ix + 1, iy)] - c.ey2[(ix, iy)] * dhz;
            }
        }

        history.record(t, &fields.hz);
    }
}
