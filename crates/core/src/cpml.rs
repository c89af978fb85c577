//! Convolutional PML engine (recursive convolution).
//!
//! Hz stays unsplit; four per-cell psi memory fields approximate the
//! complex-frequency-shifted stretching of the absorbing layer. Each psi
//! field is a geometric recursion `psi ← b·psi + a·(spatial difference)`,
//! which realises the convolution with an exponential kernel without storing
//! any field history.

use crate::{
    environment::Environment,
    field::{Array2, FieldSet},
    history::History,
    source::Source,
    units,
};

/// Number of boundary cells over which the shift term alpha ramps from 1/10
/// up to 1. The band width is fixed and does NOT follow the configured PML
/// thickness; changing it changes numerical results.
const ALPHA_RAMP_CELLS: usize = 10;

/// Base (loss-free) update coefficients.
///
/// Naming follows the derivation, not the update line. The mapping is:
///
/// - `chx = dt/(μ·dy)` multiplies the y-difference of Ex in the Hz update,
/// - `chy = dt/(μ·dx)` multiplies the x-difference of Ey in the Hz update,
/// - `cex = dt/(ε·dy)` (column-averaged) drives Ex from the y-difference of Hz,
/// - `cey = dt/(ε·dx)` (row-averaged) drives Ey from the x-difference of Hz,
/// - `px`, `py` couple pey into Ex and pex into Ey; `pm` couples phy−phx into Hz.
#[derive(Debug, Clone)]
pub struct CpmlCoefficients {
    /// (nx, ny-1)
    pub cex: Array2,
    /// (nx-1, ny)
    pub cey: Array2,
    /// (nx, ny)
    pub chx: Array2,
    /// (nx, ny)
    pub chy: Array2,
    /// (nx, ny-1)
    pub px: Array2,
    /// (nx-1, ny)
    pub py: Array2,
    /// (nx, ny)
    pub pm: Array2,
}

impl CpmlCoefficients {
    pub fn derive(env: &Environment, dx: f64, dy: f64, dt: f64) -> Self {
        // Stretching factor k = 1 on both axes.
        let (nx, ny) = (env.grid.nx, env.grid.ny);

        let mut cex_full = Array2::zeros(nx, ny);
        let mut cey_full = Array2::zeros(nx, ny);
        let mut chx = Array2::zeros(nx, ny);
        let mut chy = Array2::zeros(nx, ny);
        let mut pe = Array2::zeros(nx, ny);
        let mut pm = Array2::zeros(nx, ny);
        for ix in 0..nx {
            for iy in 0..ny {
                let e = env.eps[(ix, iy)];
                let m = env.mu[(ix, iy)];
                cex_full[(ix, iy)] = dt / (dy * e);
                cey_full[(ix, iy)] = dt / (dx * e);
                chx[(ix, iy)] = dt / (dy * m);
                chy[(ix, iy)] = dt / (dx * m);
                pe[(ix, iy)] = dt / e;
                pm[(ix, iy)] = dt / m;
            }
        }

        Self {
            cex: cex_full.average_cols(),
            cey: cey_full.average_rows(),
            chx,
            chy,
            px: pe.average_cols(),
            py: pe.average_rows(),
            pm,
        }
    }
}

/// Recursive-convolution factors, bXX = exp(−σ/(k+α)·dt/ε₀) and
/// aXX = (bXX − 1)/Δ, with α graded over the fixed boundary band.
#[derive(Debug, Clone)]
pub struct CpmlRecursion {
    /// (nx-1, ny), paired with `PsiFields::pex`.
    pub bex: Array2,
    pub aex: Array2,
    /// (nx, ny-1), paired with `PsiFields::pey`.
    pub bey: Array2,
    pub aey: Array2,
    /// (nx, ny), paired with `PsiFields::phx`.
    pub bhx: Array2,
    pub ahx: Array2,
    /// (nx, ny), paired with `PsiFields::phy`.
    pub bhy: Array2,
    pub ahy: Array2,
}

impl CpmlRecursion {
    pub fn derive(env: &Environment, dx: f64, dy: f64, dt: f64) -> Self {
        let k = 1.0;
        let (nx, ny) = (env.grid.nx, env.grid.ny);

        let mut alpha_x = Array2::filled(nx - 1, ny, 1.0);
        let mut alpha_y = Array2::filled(nx, ny - 1, 1.0);
        let mut alpha_mx = Array2::filled(nx, ny, 1.0);
        let mut alpha_my = Array2::filled(nx, ny, 1.0);
        ramp_rows(&mut alpha_x);
        ramp_rows(&mut alpha_mx);
        ramp_cols(&mut alpha_y);
        ramp_cols(&mut alpha_my);

        let recurse = |sigma: &Array2, alpha: &Array2, delta: f64| {
            let (rows, cols) = sigma.shape();
            let mut b = Array2::zeros(rows, cols);
            let mut a = Array2::zeros(rows, cols);
            for ix in 0..rows {
                for iy in 0..cols {
                    let bv = (-(sigma[(ix, iy)] / (k + alpha[(ix, iy)]))
                        * (dt / units::EPSILON_0))
                        .exp();
                    b[(ix, iy)] = bv;
                    a[(ix, iy)] = (bv - 1.0) / delta;
                }
            }
            (b, a)
        };

        let (bex, aex) = recurse(&env.sigma_x, &alpha_x, dx);
        let (bey, aey) = recurse(&env.sigma_y, &alpha_y, dy);
        let (bhx, ahx) = recurse(&env.sigma_mx, &alpha_mx, dx);
        let (bhy, ahy) = recurse(&env.sigma_my, &alpha_my, dy);

        Self {
            bex,
            aex,
            bey,
            aey,
            bhx,
            ahx,
            bhy,
            ahy,
        }
    }
}

/// Linear ramp (i+1)/10 over the first and last band rows.
fn ramp_rows(arr: &mut Array2) {
    let (rows, cols) = arr.shape();
    let band = ALPHA_RAMP_CELLS.min(rows);
    for i in 0..band {
        let v = (i + 1) as f64 / ALPHA_RAMP_CELLS as f64;
        for iy in 0..cols {
            arr[(i, iy)] = v;
            arr[(rows - 1 - i, iy)] = v;
        }
    }
}

fn ramp_cols(arr: &mut Array2) {
    let (rows, cols) = arr.shape();
    let band = ALPHA_RAMP_CELLS.min(cols);
    for i in 0..band {
        let v = (i + 1) as f64 / ALPHA_RAMP_CELLS as f64;
        for ix in 0..rows {
            arr[(ix, i)] = v;
            arr[(ix, cols - 1 - i)] = v;
        }
    }
}

/// The four psi memory fields, staggered like the differences they track.
#[derive(Debug, Clone)]
pub struct PsiFields {
    /// (nx-1, ny): x-differences of Hz, feeds the Ey update.
    pub pex: Array2,
    /// (nx, ny-1): y-differences of Hz, feeds the Ex update.
    pub pey: Array2,
    /// (nx, ny): x-differences of Ey, feeds the Hz update.
    pub phx: Array2,
    /// (nx, ny): y-differences of Ex, feeds the Hz update.
    pub phy: Array2,
}

impl PsiFields {
    pub fn zeros(nx: usize, ny: usize) -> Self {
        Self {
            pex: Array2::zeros(nx - 1, ny),
            pey: Array2::zeros(nx, ny - 1),
            phx: Array2::zeros(nx, ny),
            phy: Array2::zeros(nx, ny),
        }
    }
}

/// March `nt` recursive-convolution steps, recording Hz after each one.
pub fn evolve<S: Source + ?Sized>(
    nt: usize,
    fields: &mut FieldSet,
    psi: &mut PsiFields,
    c: &CpmlCoefficients,
    r: &CpmlRecursion,
    history: &mut History,
    source_point: (usize, usize),
    source: &S,
) {
    let (nx, ny) = fields.hz.shape();

    for t in 0..nt {
        for ix in 0..nx {
            for iy in 0..ny {
                let curl_ex = fields.ex[(ix, iy + 1)] - fields.ex[(ix, iy)];
                let curl_ey = fields.ey[(ix + 1, iy)] - fields.ey[(ix, iy)];
                psi.phy[(ix, iy)] = r.bhy[(ix, iy)] * psi.phy[(ix, iy)] + r.ahy[(ix, iy)] * curl_ex;
                psi.phx[(ix, iy)] = r.bhx[(ix, iy)] * psi.phx[(ix, iy)] + r.ahx[(ix, iy)] * curl_ey;
                fields.hz[(ix, iy)] += -c.chy[(ix, iy)] * curl_ey + c.chx[(ix, iy)] * curl_ex
                    + c.pm[(ix, iy)] * (psi.phy[(ix, iy)] - psi.phx[(ix, iy)]);
            }
        }

        fields.hz[source_point] = source.sample(t);

        for ix in 0..nx {
            for iy in 0..ny - 1 {
                let dhz = fields.hz[(ix, iy + 1)] - fields.hz[(ix, iy)];
                psi.pey[(ix, iy)] = r.bey[(ix, iy)] * psi.pey[(ix, iy)] + r.aey[(ix, iy)] * dhz;
                fields.ex[(ix, iy + 1)] +=
                    c.cex[(ix, iy)] * dhz + c.px[(ix, iy)] * psi.pey[(ix, iy)];
            }
        }
        for ix in 0..nx - 1 {
            for iy in 0..ny {
                let dhz = fields.hz[(ix + 1, iy)] - fields.hz[(ix, iy)];
                psi.pex[(ix, iy)] = r.bex[(ix, iy)] * psi.pex[(ix, iy)] + r.aex[(ix, iy)] * dhz;
                fields.ey[(ix + 1, iy)] -=
                    c.cey[(ix, iy)] * dhz + c.py[(ix, iy)] * psi.pex[(ix, iy)];
            }
        }

        history.record(t, &fields.hz);
    }
}
