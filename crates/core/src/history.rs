//! Per-step Hz snapshots for a whole run.

use crate::{field::Array2, grid::Grid2D};

/// Dense (nx, ny, nt) recording of the Hz field, one frame per timestep.
/// Frames are stored time-major; each frame is written exactly once, in
/// increasing timestep order, and never read back by the engines.
#[derive(Debug, Clone, PartialEq)]
pub struct History {
    nx: usize,
    ny: usize,
    nt: usize,
    data: Vec<f64>,
}

impl History {
    pub fn zeros(grid: Grid2D, nt: usize) -> Self {
        assert!(nt > 0, "history needs at least one timestep");
        Self {
            nx: grid.nx,
            ny: grid.ny,
            nt,
            data: vec![0.0; grid.nx * grid.ny * nt],
        }
    }

    pub fn shape(&self) -> (usize, usize, usize) {
        (self.nx, self.ny, self.nt)
    }

    /// Copy `hz` into the frame for step `t`.
    pub fn record(&mut self, t: usize, hz: &Array2) {
        assert!(t < self.nt, "timestep out of range");
        assert_eq!(hz.shape(), (self.nx, self.ny), "frame shape mismatch");
        let frame = self.nx * self.ny;
        self.data[t * frame..(t + 1) * frame].copy_from_slice(hz.as_slice());
    }

    pub fn frame(&self, t: usize) -> &[f64] {
        assert!(t < self.nt, "timestep out of range");
        let frame = self.nx * self.ny;
        &self.data[t * frame..(t + 1) * frame]
    }

    #[inline]
    pub fn get(&self, ix: usize, iy: usize, t: usize) -> f64 {
        debug_assert!(ix < self.nx && iy < self.ny && t < self.nt);
        self.data[t * self.nx * self.ny + ix * self.ny + iy]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn max_abs(&self) -> f64 {
        self.data.iter().fold(0.0_f64, |m, v| m.max(v.abs()))
    }

    /// Cut through a frame along x at fixed `iy`.
    pub fn row_cut(&self, iy: usize, t: usize) -> Vec<f64> {
        (0..self.nx).map(|ix| self.get(ix, iy, t)).collect()
    }

    /// Cut through a frame along y at fixed `ix`.
    pub fn col_cut(&self, ix: usize, t: usize) -> Vec<f64> {
        (0..self.ny).map(|iy| self.get(ix, iy, t)).collect()
    }

    /// Time-major nested frames of |Hz|, the shape serializers expect.
    pub fn abs_frames(&self) -> Vec<Vec<Vec<f64>>> {
        (0..self.nt)
            .map(|t| {
                (0..self.nx)
                    .map(|ix| (0..self.ny).map(|iy| self.get(ix, iy, t).abs()).collect())
                    .collect()
            })
            .collect()
    }
}
