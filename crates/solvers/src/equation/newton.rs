//! Newton-Raphson iteration.
//!
//! The caller supplies both `f` and its derivative. With an expression from
//! `numeth-expr`, the derivative comes from `Expression::derivative`.

use numeth_core::{Function, Observer, Trace, evaluate};
use tracing::debug;

use super::{Action, Config, Error, Failure, Solution, Status};

/// Derivatives smaller than this in magnitude are treated as zero.
pub const ZERO_DERIVATIVE: f64 = 1e-12;

/// Fraction of the tolerance below which a change in error counts as a stall.
const STALL_FRACTION: f64 = 0.01;

/// State of one Newton-Raphson step.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Record {
    pub iter: usize,
    pub x: f64,
    pub fx: f64,
    pub dfx: f64,
    pub x_next: f64,
    /// `|x_next - x|`.
    pub error: f64,
}

/// Finds a root of `f` by Newton-Raphson iteration from `x0`.
///
/// The run stops as [`Status::Stalled`] when two consecutive errors differ
/// by less than 1% of the tolerance while still above it.
///
/// # Observer
///
/// The observer receives each [`Record`] and may return [`Action::StopEarly`].
///
/// # Errors
///
/// Returns an error if `x0` is not finite.
pub fn solve<F, D, Obs>(
    f: &F,
    df: &D,
    x0: f64,
    config: &Config,
    mut observer: Obs,
) -> Result<Solution<Record>, Error>
where
    F: Function<1>,
    D: Function<1>,
    Obs: Observer<Record, Action>,
{
    if !x0.is_finite() {
        return Err(Error::NonFiniteGuess(x0));
    }

    let tol = config.tolerance();
    let mut trace = Trace::new();
    let mut x = x0;
    let mut previous_error: Option<f64> = None;

    for iter in 1..=config.max_iters() {
        let fx = match evaluate(f, [x]) {
            Ok(v) => v,
            Err(err) => return Ok(non_finite(iter, x, err.value, trace)),
        };
        let dfx = match evaluate(df, [x]) {
            Ok(v) => v,
            Err(err) => return Ok(non_finite(iter, x, err.value, trace)),
        };

        if dfx.abs() < ZERO_DERIVATIVE {
            let failure = Failure::ZeroDerivative {
                iter,
                x,
                derivative: dfx,
            };
            return Ok(Solution::failed(failure, x, iter - 1, trace));
        }

        let x_next = x - fx / dfx;
        let error = (x_next - x).abs();

        let record = trace.push(Record {
            iter,
            x,
            fx,
            dfx,
            x_next,
            error,
        });
        let stop = observer.observe(record);

        let status = if error < tol {
            debug!(iter, root = x_next, "newton-raphson converged");
            Some(Status::Converged)
        } else if let Some(Action::StopEarly) = stop {
            Some(Status::StoppedByObserver)
        } else if previous_error.is_some_and(|prev| (prev - error).abs() < STALL_FRACTION * tol) {
            debug!(iter, error, "newton-raphson stalled");
            Some(Status::Stalled)
        } else {
            None
        };

        if let Some(status) = status {
            return Ok(finish(f, status, x_next, error, iter, trace));
        }

        previous_error = Some(error);
        x = x_next;
    }

    debug!(max_iters = config.max_iters(), "newton-raphson hit the iteration limit");
    let error = trace.last().map_or(f64::NAN, |record| record.error);
    Ok(finish(f, Status::MaxIters, x, error, config.max_iters(), trace))
}

/// Finds a root of `f` by Newton-Raphson iteration without observation.
///
/// # Errors
///
/// See [`solve`].
pub fn solve_unobserved<F, D>(
    f: &F,
    df: &D,
    x0: f64,
    config: &Config,
) -> Result<Solution<Record>, Error>
where
    F: Function<1>,
    D: Function<1>,
{
    solve(f, df, x0, config, ())
}

/// Evaluates the residual at the final estimate.
///
/// A non-finite residual replaces `status` with a failure at `x`.
fn finish<F: Function<1>>(
    f: &F,
    status: Status,
    x: f64,
    error: f64,
    iters: usize,
    trace: Trace<Record>,
) -> Solution<Record> {
    match evaluate(f, [x]) {
        Ok(residual) => Solution {
            status,
            x,
            residual,
            error,
            iters,
            trace,
        },
        Err(err) => {
            debug!(x, value = err.value, "newton-raphson left the domain of f");
            let failure = Failure::NonFinite {
                iter: iters,
                x,
                value: err.value,
            };
            Solution::failed(failure, x, iters, trace)
        }
    }
}

fn non_finite(iter: usize, x: f64, value: f64, trace: Trace<Record>) -> Solution<Record> {
    Solution::failed(Failure::NonFinite { iter, x, value }, x, iter - 1, trace)
}
