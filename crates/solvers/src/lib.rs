//! Numerical method solvers.
//!
//! Every solver is a plain function that owns its state for the duration of
//! one run, records each step in a [`Trace`], and reports how it terminated
//! through a `Status`. Input errors are returned as `Err` before any
//! iteration happens; non-convergence and numeric failures are `Ok` results
//! whose status says what went wrong.
//!
//! # Modules
//!
//! - [`equation`] — bracket search and root finders
//! - [`linear`] — Jacobi and Gauss-Seidel iteration
//! - [`quadrature`] — trapezoid, Simpson and Romberg integration
//! - [`transient`] — forward Euler for first-order ODEs
//!
//! [`Trace`]: numeth_core::Trace

mod config;

pub mod equation;
pub mod linear;
pub mod quadrature;
pub mod transient;

pub use config::{Config, ConfigError};
