use numeth_core::Trace;

/// Control actions supported by the Euler solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop the solver early and return the solution so far.
    StopEarly,
}

/// One Euler step from `(x, y)`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Step {
    /// The step number, starting at 1.
    pub step: usize,
    pub x: f64,
    pub y: f64,
    /// `f(x, y)`.
    pub slope: f64,
    pub y_next: f64,
}

/// Indicates how the solver terminated.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(rename_all = "snake_case")
)]
pub enum Status {
    /// Completed all steps.
    Complete,

    /// Stopped early due to an observer action.
    StoppedByObserver,

    /// The slope or the next state was not finite at `step`.
    Failed {
        step: usize,
        x: f64,
        y: f64,
        value: f64,
    },
}

impl Status {
    /// Returns a human-readable reason for an incomplete run.
    #[must_use]
    pub fn reason(&self) -> Option<String> {
        match self {
            Status::Complete => None,
            Status::StoppedByObserver => Some("stopped by observer".to_owned()),
            Status::Failed { step, x, y, value } => Some(format!(
                "non-finite value {value} at x = {x}, y = {y} (step {step})"
            )),
        }
    }
}

/// The result of an Euler integration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Solution {
    pub status: Status,
    /// Final node reached.
    pub x: f64,
    /// State at the final node.
    pub y: f64,
    /// Number of steps completed.
    pub steps: usize,
    pub trace: Trace<Step>,
}

impl Solution {
    pub(super) fn new(status: Status, x: f64, y: f64, steps: usize, trace: Trace<Step>) -> Self {
        Self {
            status,
            x,
            y,
            steps,
            trace,
        }
    }

    /// Returns true if every step completed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.status == Status::Complete
    }
}
