use thiserror::Error;

/// Errors that prevent or stop a quadrature rule.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum Error {
    #[error("integration bound must be finite, got {0}")]
    NonFiniteBound(f64),

    #[error("integration interval is empty: both bounds are {0}")]
    EmptyInterval(f64),

    #[error("panel count must be between 1 and {max}, got {n}")]
    Panels { n: usize, max: usize },

    #[error("Simpson's rule needs an even panel count, got {0}")]
    OddPanels(usize),

    #[error("Romberg iterations must be at most {max}, got {value}")]
    TooManyRows { value: usize, max: usize },

    #[error("non-finite function value {value} at x = {x}")]
    NonFinite { x: f64, value: f64 },
}
