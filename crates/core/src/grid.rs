//! Uniform Yee-grid metadata.

use serde::{Deserialize, Serialize};

use crate::units;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Grid2D {
    pub nx: usize,
    pub ny: usize,
    #[serde(default = "default_spacing")]
    pub dx: f64,
    #[serde(default = "default_spacing")]
    pub dy: f64,
}

impl Grid2D {
    pub fn new(nx: usize, ny: usize, dx: f64, dy: f64) -> Self {
        assert!(nx > 0 && ny > 0, "grid dimensions must be non-zero");
        assert!(dx > 0.0 && dy > 0.0, "cell sizes must be positive");
        Self { nx, ny, dx, dy }
    }

    pub fn len(&self) -> usize {
        self.nx * self.ny
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Physical extent in metres.
    pub fn lengths(&self) -> (f64, f64) {
        (self.nx as f64 * self.dx, self.ny as f64 * self.dy)
    }

    /// Largest stable time step for the lossless vacuum case,
    /// dt = (c·√(dx⁻² + dy⁻²))⁻¹.
    pub fn courant_dt(&self) -> f64 {
        (units::C * (self.dx.powi(-2) + self.dy.powi(-2)).sqrt()).recip()
    }

    /// Diagonal cell size δ = √((dx² + dy²)/2), used by the PML grading.
    pub fn diagonal(&self) -> f64 {
        ((self.dx * self.dx + self.dy * self.dy) / 2.0).sqrt()
    }

    /// Convert physical coordinates in metres to cell indices.
    pub fn meters_to_cells(&self, x: f64, y: f64) -> (usize, usize) {
        ((x / self.dx) as usize, (y / self.dy) as usize)
    }
}

fn default_spacing() -> f64 {
    0.05
}
