//! Plain leapfrog engine without any absorbing boundary.
//!
//! The outermost E samples are never updated, which makes the domain edge a
//! perfect electric conductor: outgoing waves reflect back in almost
//! completely. Useful as the reference the PML variants are judged against.

use crate::{
    field::FieldSet,
    history::History,
    source::Source,
    units,
};

/// Scalar update coefficients for the uniform vacuum case.
#[derive(Debug, Clone, Copy)]
pub struct NoPmlCoefficients {
    pub cex: f64,
    pub cey: f64,
    pub chzx: f64,
    pub chzy: f64,
}

impl NoPmlCoefficients {
    pub fn derive(dx: f64, dy: f64, dt: f64) -> Self {
        Self {
            cex: dt / (units::EPSILON_0 * dy),
            cey: dt / (units::EPSILON_0 * dx),
            chzx: dt / (units::MU_0 * dx),
            chzy: dt / (units::MU_0 * dy),
        }
    }
}

/// March `nt` leapfrog steps, recording Hz after each one. H is advanced
/// first from the previous E curl, then the hard source overwrites the
/// source cell, then E is advanced from the fresh H.
pub fn evolve<S: Source + ?Sized>(
    nt: usize,
    fields: &mut FieldSet,
    c: &NoPmlCoefficients,
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
                fields.hz[(ix, iy)] += -c.chzx * curl_ey + c.chzy * curl_ex;
            }
        }

        fields.hz[source_point] = source.sample(t);

        // Interior E samples only; the boundary ones stay pinned at zero.
        for ix in 0..nx {
            for iy in 0..ny - 1 {
                let dhz = fields.hz[(ix, iy + 1)] - fields.hz[(ix, iy)];
                fields.ex[(ix, iy + 1)] += c.cex * dhz;
            }
        }
        for ix in 0..nx - 1 {
            for iy in 0..ny {
                let dhz = fields.hz[(ix + 1, iy)] - fields.hz[(ix, iy)];
                fields.ey[(ix + 1, iy)] -= c.cey * dhz;
            }
        }

        history.record(t, &fields.hz);
    }
}
