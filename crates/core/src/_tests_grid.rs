#![cfg(test)]

use super::grid::Grid2D;
use super::units;

#[test]
fn courant_dt_matches_closed_form() {
    let grid = Grid2D::new(100, 100, 0.05, 0.05);
    let expected = 1.0 / (units::C * (0.05_f64.powi(-2) + 0.05_f64.powi(-2)).sqrt());
    assert!((grid.courant_dt() - expected).abs() < 1e-25);
}

#[test]
fn courant_dt_shrinks_with_finer_cells() {
    let coarse = Grid2D::new(50, 50, 0.1, 0.1);
    let fine = Grid2D::new(50, 50, 0.01, 0.01);
    assert!(fine.courant_dt() < coarse.courant_dt());
}

#[test]
fn diagonal_of_square_cells_is_the_cell_size() {
    let grid = Grid2D::new(10, 10, 0.05, 0.05);
    assert!((grid.diagonal() - 0.05).abs() < 1e-15);
}

#[test]
fn lengths_are_cell_count_times_spacing() {
    let grid = Grid2D::new(100, 80, 0.05, 0.02);
    let (lx, ly) = grid.lengths();
    assert!((lx - 5.0).abs() < 1e-12);
    assert!((ly - 1.6).abs() < 1e-12);
}

#[test]
fn meters_to_cells_truncates() {
    let grid = Grid2D::new(100, 100, 0.05, 0.05);
    assert_eq!(grid.meters_to_cells(2.2, 3.0), (44, 60));
    assert_eq!(grid.meters_to_cells(0.049, 0.051), (0, 1));
}

#[test]
#[should_panic(expected = "grid dimensions must be non-zero")]
fn zero_dimension_rejected() {
    let _ = Grid2D::new(0, 10, 0.05, 0.05);
}

#[test]
#[should_panic(expected = "cell sizes must be positive")]
fn non_positive_spacing_rejected() {
    let _ = Grid2D::new(10, 10, 0.05, 0.0);
}
