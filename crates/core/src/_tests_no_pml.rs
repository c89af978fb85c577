#![cfg(test)]

use super::field::FieldSet;
use super::grid::Grid2D;
use super::history::History;
use super::no_pml::{evolve, NoPmlCoefficients};
use super::source::{impulse_source, null_source};
use super::units;

fn grid20() -> Grid2D {
    Grid2D::new(20, 20, 0.05, 0.05)
}

#[test]
fn coefficients_are_the_vacuum_ratios() {
    let c = NoPmlCoefficients::derive(0.05, 0.02, 1e-10);
    assert!((c.cex - 1e-10 / (units::EPSILON_0 * 0.02)).abs() < 1e-12);
    assert!((c.cey - 1e-10 / (units::EPSILON_0 * 0.05)).abs() < 1e-12);
    assert!((c.chzx - 1e-10 / (units::MU_0 * 0.05)).abs() < 1e-12);
    assert!((c.chzy - 1e-10 / (units::MU_0 * 0.02)).abs() < 1e-12);
}

#[test]
fn impulse_at_t0_leaves_a_single_hot_cell_in_frame_zero() {
    let grid = grid20();
    let mut fields = FieldSet::zeros(grid);
    let c = NoPmlCoefficients::derive(0.05, 0.05, 1e-10);
    let mut history = History::zeros(grid, 5);
    evolve(5, &mut fields, &c, &mut history, (10, 10), &impulse_source);

    assert_eq!(history.shape(), (20, 20, 5));
    for ix in 0..20 {
        for iy in 0..20 {
            let expected = if (ix, iy) == (10, 10) { 1.0 } else { 0.0 };
            assert_eq!(history.get(ix, iy, 0), expected);
        }
    }
}

#[test]
fn zero_source_on_zero_fields_is_a_fixed_point() {
    let grid = grid20();
    let mut fields = FieldSet::zeros(grid);
    let c = NoPmlCoefficients::derive(0.05, 0.05, 1e-10);
    let mut history = History::zeros(grid, 10);
    evolve(10, &mut fields, &c, &mut history, (10, 10), &null_source);

    assert!(history.as_slice().iter().all(|&v| v == 0.0));
    assert!(fields.ex.as_slice().iter().all(|&v| v == 0.0));
    assert!(fields.ey.as_slice().iter().all(|&v| v == 0.0));
}

#[test]
fn hard_source_overwrites_the_source_cell_every_step() {
    let grid = grid20();
    let mut fields = FieldSet::zeros(grid);
    let c = NoPmlCoefficients::derive(0.05, 0.05, grid.courant_dt());
    let mut history = History::zeros(grid, 40);
    let src = |t: usize| (t as f64 / 5.0).sin();
    evolve(40, &mut fields, &c, &mut history, (10, 10), &src);

    for t in 0..40 {
        assert_eq!(history.get(10, 10, t), (t as f64 / 5.0).sin());
    }
}

#[test]
fn runs_are_bit_identical() {
    let grid = grid20();
    let c = NoPmlCoefficients::derive(0.05, 0.05, grid.courant_dt());
    let src = |t: usize| (t as f64 / 5.0).sin();

    let run = || {
        let mut fields = FieldSet::zeros(grid);
        let mut history = History::zeros(grid, 30);
        evolve(30, &mut fields, &c, &mut history, (10, 10), &src);
        history
    };

    assert_eq!(run(), run());
}

#[test]
fn impulse_spreads_outward_over_time() {
    let grid = grid20();
    let mut fields = FieldSet::zeros(grid);
    let c = NoPmlCoefficients::derive(0.05, 0.05, grid.courant_dt());
    let mut history = History::zeros(grid, 12);
    evolve(12, &mut fields, &c, &mut history, (10, 10), &impulse_source);

    // Nothing reaches a cell 8 steps away after only 3 steps.
    assert_eq!(history.get(2, 10, 3), 0.0);
    // But the immediate neighbourhood is excited after a few steps.
    let near: f64 = (9..=11)
        .flat_map(|ix| (9..=11).map(move |iy| (ix, iy)))
        .map(|(ix, iy)| history.get(ix, iy, 4).abs())
        .sum();
    assert!(near > 0.0);
}
