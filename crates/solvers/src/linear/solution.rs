use numeth_core::Trace;

/// Control actions supported by the linear iterators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop the solver early and return the latest iterate.
    StopEarly,
}

/// Previous and updated iterates of one sweep.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Record {
    pub iter: usize,
    pub x_old: Vec<f64>,
    pub x_new: Vec<f64>,
    /// Euclidean norm of `x_new - x_old`.
    pub error: f64,
}

/// Indicates how a linear iteration terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(rename_all = "snake_case")
)]
pub enum Status {
    Converged,
    MaxIters,
    StoppedByObserver,
    /// The sweep at `iter` produced a non-finite entry.
    Diverged { iter: usize },
}

impl Status {
    /// Returns a human-readable reason for a non-converged status.
    #[must_use]
    pub fn reason(&self) -> Option<String> {
        match self {
            Status::Converged => None,
            Status::MaxIters => Some("exceeded maximum iterations".to_owned()),
            Status::StoppedByObserver => Some("stopped by observer".to_owned()),
            Status::Diverged { iter } => {
                Some(format!("iterate diverged to a non-finite value at iteration {iter}"))
            }
        }
    }
}

/// The result of a Jacobi or Gauss-Seidel run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Solution {
    pub status: Status,
    /// Latest finite iterate.
    pub x: Vec<f64>,
    pub error: f64,
    pub iters: usize,
    /// Whether the matrix is row-wise diagonally dominant.
    pub diagonally_dominant: bool,
    pub trace: Trace<Record>,
}

impl Solution {
    /// Returns true if the run converged.
    #[must_use]
    pub fn is_converged(&self) -> bool {
        self.status == Status::Converged
    }
}
