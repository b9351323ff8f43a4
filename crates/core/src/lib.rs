//! Core traits and types for the numeth solvers.
//!
//! This crate defines the shared abstractions every solver builds on:
//!
//! - [`Function`] — a real-valued function of `N` real arguments
//! - [`evaluate`] — calls a function and rejects non-finite results
//! - [`Observer`] — receives solver events and optionally returns control actions
//! - [`Trace`] — the ordered, append-only record of a solver run

mod function;
mod observer;
mod trace;

pub use function::{FromFn, Function, NonFinite, evaluate, from_fn};
pub use observer::Observer;
pub use trace::Trace;
