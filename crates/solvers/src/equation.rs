//! Root finders for scalar equations `f(x) = 0`.
//!
//! # Solvers
//!
//! - [`bisection`] — guaranteed convergence on a bracketed interval
//! - [`secant`] — derivative-free open method seeded with two points
//! - [`newton`] — Newton-Raphson, given `f` and its derivative
//! - [`fixed_point`] — iterates `x = g(x)`
//!
//! [`bracket_search`] turns an interval without a sign change into one that
//! brackets a root, for use with bisection.
//!
//! All root finders share [`Config`], [`Error`], [`Status`] and
//! [`Solution`]. Each one defines its own per-iteration record type.

mod action;
mod error;
mod solution;

pub mod bisection;
pub mod bracket_search;
pub mod fixed_point;
pub mod newton;
pub mod secant;

pub use action::Action;
pub use error::Error;
pub use solution::{Failure, Solution, Status};

pub use crate::{Config, ConfigError};
