use thiserror::Error;

use super::bisection::BracketError;

/// Input errors that prevent a root finder from starting.
///
/// Problems discovered while iterating are not errors; they are reported
/// through [`Status`](super::Status) alongside the trace gathered so far.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum Error {
    #[error(transparent)]
    InvalidBracket(#[from] BracketError),

    #[error(
        "no sign change between f({left}) = {f_left} and f({right}) = {f_right}"
    )]
    NoSignChange {
        left: f64,
        right: f64,
        f_left: f64,
        f_right: f64,
    },

    #[error("initial guess must be finite, got {0}")]
    NonFiniteGuess(f64),

    #[error("initial guesses must differ, both are {0}")]
    IdenticalGuesses(f64),
}
