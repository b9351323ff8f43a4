use numeth_core::Trace;
use thiserror::Error;

/// A numeric condition that stopped a root finder mid-run.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(tag = "kind", rename_all = "snake_case")
)]
pub enum Failure {
    #[error("non-finite function value {value} at x = {x} (iteration {iter})")]
    NonFinite { iter: usize, x: f64, value: f64 },

    #[error("derivative is zero at x = {x} (iteration {iter})")]
    ZeroDerivative { iter: usize, x: f64, derivative: f64 },

    #[error("zero denominator: f({x0}) equals f({x1}) (iteration {iter})")]
    ZeroDenominator { iter: usize, x0: f64, x1: f64 },
}

/// Indicates how a root finder terminated.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(rename_all = "snake_case")
)]
pub enum Status {
    /// The convergence criterion was met.
    Converged,

    /// The iteration budget ran out first.
    MaxIters,

    /// Successive errors stopped changing while still above tolerance.
    Stalled,

    /// Stopped early due to an observer action.
    StoppedByObserver,

    /// A numeric failure stopped the run.
    Failed(Failure),
}

impl Status {
    /// Returns a human-readable reason for a non-converged status.
    #[must_use]
    pub fn reason(&self) -> Option<String> {
        match self {
            Status::Converged => None,
            Status::MaxIters => Some("exceeded maximum iterations".to_owned()),
            Status::Stalled => Some("iteration stalled before reaching tolerance".to_owned()),
            Status::StoppedByObserver => Some("stopped by observer".to_owned()),
            Status::Failed(failure) => Some(failure.to_string()),
        }
    }
}

/// The result of a root finder run.
///
/// `x` is the latest estimate and `residual` the function value there
/// (for fixed-point iteration, `g(x) - x`). When the run failed, `x` is the
/// point where the failure occurred.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Solution<R> {
    pub status: Status,
    pub x: f64,
    pub residual: f64,
    pub error: f64,
    pub iters: usize,
    pub trace: Trace<R>,
}

impl<R> Solution<R> {
    /// Returns true if the run converged.
    #[must_use]
    pub fn is_converged(&self) -> bool {
        self.status == Status::Converged
    }

    pub(crate) fn failed(failure: Failure, x: f64, iters: usize, trace: Trace<R>) -> Self {
        let residual = match failure {
            Failure::NonFinite { value, .. } => value,
            _ => f64::NAN,
        };
        Self {
            status: Status::Failed(failure),
            x,
            residual,
            error: f64::NAN,
            iters,
            trace,
        }
    }
}
