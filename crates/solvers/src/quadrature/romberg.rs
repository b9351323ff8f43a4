//! Romberg integration.
//!
//! Row `i` of the table starts with the trapezoid estimate on `2^i` panels,
//! built from row `i - 1` by sampling only the new midpoints. Column `j`
//! applies Richardson extrapolation:
//!
//! ```text
//! R[i][j] = R[i][j-1] + (R[i][j-1] - R[i-1][j-1]) / (4^j - 1)
//! ```
//!
//! The run converges once `|R[i][i] - R[i-1][i-1]| < tolerance`.

use numeth_core::{Function, Observer, Trace, evaluate};
use tracing::debug;

use super::{Error, trapezoid, validate_interval};
use crate::Config;

/// Largest number of table rows a run may build.
pub const MAX_ROWS: usize = 20;

/// Control actions supported by Romberg integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop after the current row and return the latest diagonal entry.
    StopEarly,
}

/// One completed row of the Romberg table.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Row {
    /// Row number, starting at 1 for the single-panel trapezoid.
    pub iter: usize,
    /// Trapezoid panels used in column 0.
    pub panels: usize,
    /// `R[i][0..=i]`.
    pub estimates: Vec<f64>,
    /// `|R[i][i] - R[i-1][i-1]|`, absent on the first row.
    pub error: Option<f64>,
}

/// Indicates how a Romberg run terminated.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(rename_all = "snake_case")
)]
pub enum Status {
    Converged,
    MaxIters,
    StoppedByObserver,
    /// A trapezoid sample in the row after the last completed one was not finite.
    Failed { x: f64, value: f64 },
}

impl Status {
    /// Returns a human-readable reason for a non-converged status.
    #[must_use]
    pub fn reason(&self) -> Option<String> {
        match self {
            Status::Converged => None,
            Status::MaxIters => Some("exceeded maximum iterations".to_owned()),
            Status::StoppedByObserver => Some("stopped by observer".to_owned()),
            Status::Failed { x, value } => {
                Some(format!("non-finite function value {value} at x = {x}"))
            }
        }
    }
}

/// The result of a Romberg run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Solution {
    pub status: Status,
    /// Latest diagonal entry, or NaN if no row was completed.
    pub integral: f64,
    pub error: Option<f64>,
    pub iters: usize,
    /// Completed rows only.
    pub table: Trace<Row>,
}

impl Solution {
    /// Returns true if the run converged.
    #[must_use]
    pub fn is_converged(&self) -> bool {
        self.status == Status::Converged
    }
}

/// Integrates `f` over `[a, b]` by Romberg extrapolation.
///
/// At most `config.max_iters()` rows are built.
///
/// # Observer
///
/// The observer receives each completed [`Row`] and may return
/// [`Action::StopEarly`].
///
/// # Errors
///
/// Returns an error if the interval is invalid or the row budget exceeds
/// [`MAX_ROWS`].
pub fn integrate<F, Obs>(
    f: &F,
    a: f64,
    b: f64,
    config: &Config,
    mut observer: Obs,
) -> Result<Solution, Error>
where
    F: Function<1>,
    Obs: Observer<Row, Action>,
{
    validate_interval(a, b)?;
    if config.max_iters() > MAX_ROWS {
        return Err(Error::TooManyRows {
            value: config.max_iters(),
            max: MAX_ROWS,
        });
    }

    let mut table: Trace<Row> = Trace::with_capacity(config.max_iters());

    let first = match trapezoid::integrate(f, a, b, 1) {
        Ok(q) => q.integral,
        Err(Error::NonFinite { x, value }) => {
            return Ok(finish(Status::Failed { x, value }, table));
        }
        Err(err) => return Err(err),
    };
    let row = table.push(Row {
        iter: 1,
        panels: 1,
        estimates: vec![first],
        error: None,
    });
    if let Some(Action::StopEarly) = observer.observe(row) {
        return Ok(finish(Status::StoppedByObserver, table));
    }

    for iter in 2..=config.max_iters() {
        let Some(previous) = table.last() else {
            break;
        };
        let panels = previous.panels * 2;
        let h = (b - a) / panels as f64;

        // Only the odd nodes are new.
        let mut midpoint_sum = 0.0;
        for k in (1..panels).step_by(2) {
            let x = a + k as f64 * h;
            match evaluate(f, [x]) {
                Ok(fx) => midpoint_sum += fx,
                Err(err) => {
                    let status = Status::Failed {
                        x,
                        value: err.value,
                    };
                    return Ok(finish(status, table));
                }
            }
        }

        let mut estimates = Vec::with_capacity(iter);
        estimates.push(0.5 * previous.estimates[0] + h * midpoint_sum);
        let mut factor = 1.0;
        for j in 1..iter {
            factor *= 4.0;
            let current = estimates[j - 1];
            estimates.push(current + (current - previous.estimates[j - 1]) / (factor - 1.0));
        }

        let error = (estimates[iter - 1] - previous.estimates[iter - 2]).abs();
        let row = table.push(Row {
            iter,
            panels,
            estimates,
            error: Some(error),
        });
        let stop = observer.observe(row);

        if error < config.tolerance() {
            debug!(iter, error, "romberg converged");
            return Ok(finish(Status::Converged, table));
        }
        if let Some(Action::StopEarly) = stop {
            return Ok(finish(Status::StoppedByObserver, table));
        }
    }

    debug!(max_iters = config.max_iters(), "romberg hit the iteration limit");
    Ok(finish(Status::MaxIters, table))
}

/// Integrates `f` over `[a, b]` by Romberg extrapolation without observation.
///
/// # Errors
///
/// See [`integrate`].
pub fn integrate_unobserved<F: Function<1>>(
    f: &F,
    a: f64,
    b: f64,
    config: &Config,
) -> Result<Solution, Error> {
    integrate(f, a, b, config, ())
}

fn finish(status: Status, table: Trace<Row>) -> Solution {
    let (integral, error) = table.last().map_or((f64::NAN, None), |row| {
        (row.estimates[row.estimates.len() - 1], row.error)
    });
    Solution {
        status,
        integral,
        error,
        iters: table.len(),
        table,
    }
}
