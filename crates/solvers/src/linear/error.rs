use thiserror::Error;

use super::SystemError;

/// Input errors that prevent a linear iteration from starting.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("invalid system: {0}")]
    System(#[from] SystemError),

    #[error("initial guess has {found} entries, expected {expected}")]
    GuessLength { expected: usize, found: usize },

    #[error("initial guess entry {index} is not finite")]
    NonFiniteGuess { index: usize },
}
