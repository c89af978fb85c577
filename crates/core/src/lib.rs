//! 2D transverse-magnetic FDTD on a staggered Yee grid, with three
//! interchangeable boundary treatments: none, Berenger split-field PML and
//! convolutional PML.

pub mod berenger;
pub mod cpml;
pub mod environment;
pub mod field;
pub mod grid;
pub mod history;
pub mod io;
pub mod no_pml;
pub mod simulation;
pub mod source;
pub mod units;

#[cfg(test)]
mod _tests_berenger;
#[cfg(test)]
mod _tests_grid;
#[cfg(test)]
mod _tests_no_pml;
#[cfg(test)]
mod _tests_simulation;
