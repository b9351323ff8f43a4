use thiserror::Error;

/// Iteration budget and convergence tolerance shared by the iterative solvers.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Config {
    max_iters: usize,
    tolerance: f64,
}

/// Errors that can occur when validating a solver config.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ConfigError {
    #[error("max_iters must be between 1 and {max}, got {value}")]
    MaxIters { value: usize, max: usize },

    #[error("tolerance must be finite and positive, got {0}")]
    Tolerance(f64),
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_iters: 100,
            tolerance: 1e-6,
        }
    }
}

impl Config {
    /// Largest iteration budget a solver will accept.
    pub const MAX_ITERS: usize = 10_000;

    /// Creates a new config with a validated budget and tolerance.
    ///
    /// # Errors
    ///
    /// Returns an error if `max_iters` is zero or above [`Config::MAX_ITERS`],
    /// or if `tolerance` is not a finite positive number.
    pub fn new(max_iters: usize, tolerance: f64) -> Result<Self, ConfigError> {
        if max_iters == 0 || max_iters > Self::MAX_ITERS {
            return Err(ConfigError::MaxIters {
                value: max_iters,
                max: Self::MAX_ITERS,
            });
        }
        if !tolerance.is_finite() || tolerance <= 0.0 {
            return Err(ConfigError::Tolerance(tolerance));
        }

        Ok(Self {
            max_iters,
            tolerance,
        })
    }

    /// Returns the maximum number of iterations.
    #[must_use]
    pub fn max_iters(&self) -> usize {
        self.max_iters
    }

    /// Returns the convergence tolerance.
    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }
}
