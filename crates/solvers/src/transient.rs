//! Solvers for initial value problems.

pub mod euler;
