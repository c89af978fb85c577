//! Contiguous real-valued array storage for the staggered Yee fields.
//!
//! All field and coefficient arrays are dense row-major `f64` buffers. The
//! three field components live on staggered positions, so their shapes differ
//! from the cell grid: for an (nx, ny) cell grid,
//!
//! - `Ex` has shape (nx, ny+1) — tangential to horizontal cell edges,
//! - `Ey` has shape (nx+1, ny) — tangential to vertical cell edges,
//! - `Hz` has shape (nx, ny) — one sample per cell centre.

use std::ops::{Index, IndexMut};

use crate::grid::Grid2D;

/// Dense row-major 2D array of `f64`, indexed as `a[(ix, iy)]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Array2 {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Array2 {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        assert!(rows > 0 && cols > 0, "array dimensions must be non-zero");
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    pub fn filled(rows: usize, cols: usize, value: f64) -> Self {
        let mut arr = Self::zeros(rows, cols);
        arr.data.fill(value);
        arr
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    #[inline]
    fn idx(&self, ix: usize, iy: usize) -> usize {
        debug_assert!(ix < self.rows && iy < self.cols);
        ix * self.cols + iy
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub fn fill(&mut self, value: f64) {
        self.data.fill(value);
    }

    /// Apply `f` to every element in place.
    pub fn map_inplace<F: FnMut(f64) -> f64>(&mut self, mut f: F) {
        for v in &mut self.data {
            *v = f(*v);
        }
    }

    pub fn max_abs(&self) -> f64 {
        self.data.iter().fold(0.0_f64, |m, v| m.max(v.abs()))
    }

    /// Mean of adjacent elements along the row axis; shape (rows-1, cols).
    /// Aligns cell-centred quantities with the Ey sample positions.
    pub fn average_rows(&self) -> Array2 {
        assert!(self.rows > 1, "need at least two rows to average");
        let mut out = Array2::zeros(self.rows - 1, self.cols);
        for ix in 0..self.rows - 1 {
            for iy in 0..self.cols {
                out[(ix, iy)] = 0.5 * (self[(ix, iy)] + self[(ix + 1, iy)]);
            }
        }
        out
    }

    /// Mean of adjacent elements along the column axis; shape (rows, cols-1).
    /// Aligns cell-centred quantities with the Ex sample positions.
    pub fn average_cols(&self) -> Array2 {
        assert!(self.cols > 1, "need at least two columns to average");
        let mut out = Array2::zeros(self.rows, self.cols - 1);
        for ix in 0..self.rows {
            for iy in 0..self.cols - 1 {
                out[(ix, iy)] = 0.5 * (self[(ix, iy)] + self[(ix, iy + 1)]);
            }
        }
        out
    }
}

impl Index<(usize, usize)> for Array2 {
    type Output = f64;

    #[inline]
    fn index(&self, (ix, iy): (usize, usize)) -> &f64 {
        &self.data[self.idx(ix, iy)]
    }
}

impl IndexMut<(usize, usize)> for Array2 {
    #[inline]
    fn index_mut(&mut self, (ix, iy): (usize, usize)) -> &mut f64 {
        let i = self.idx(ix, iy);
        &mut self.data[i]
    }
}

/// The three staggered field components for one run. Owned exclusively by the
/// evolution engine while stepping; nothing else may alias them.
#[derive(Debug, Clone)]
pub struct FieldSet {
    pub ex: Array2,
    pub ey: Array2,
    pub hz: Array2,
}

impl FieldSet {
    pub fn zeros(grid: Grid2D) -> Self {
        Self {
            ex: Array2::zeros(grid.nx, grid.ny + 1),
            ey: Array2::zeros(grid.nx + 1, grid.ny),
            hz: Array2::zeros(grid.nx, grid.ny),
        }
    }
}
