//! Secant method.
//!
//! Replaces the derivative in Newton's update with the slope through the two
//! most recent iterates. Convergence is not guaranteed; a run that never
//! settles ends with [`Status::MaxIters`].

use numeth_core::{Function, Observer, Trace, evaluate};
use tracing::debug;

use super::{Action, Config, Error, Failure, Solution, Status};

/// Below this magnitude the error switches from relative to absolute.
const RELATIVE_FLOOR: f64 = 1e-12;

/// State of one secant step.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Record {
    pub iter: usize,
    pub x0: f64,
    pub x1: f64,
    pub fx0: f64,
    pub fx1: f64,
    pub x2: f64,
    /// `|(x2 - x1) / x2|`, or `|x2 - x1|` when `x2` is near zero.
    pub error: f64,
}

/// Finds a root of `f` by the secant method from seeds `x0` and `x1`.
///
/// # Observer
///
/// The observer receives each [`Record`] and may return [`Action::StopEarly`].
///
/// # Errors
///
/// Returns an error if either seed is non-finite or the seeds are equal.
#[allow(clippy::float_cmp)]
pub fn solve<F, Obs>(
    f: &F,
    x0: f64,
    x1: f64,
    config: &Config,
    mut observer: Obs,
) -> Result<Solution<Record>, Error>
where
    F: Function<1>,
    Obs: Observer<Record, Action>,
{
    for x in [x0, x1] {
        if !x.is_finite() {
            return Err(Error::NonFiniteGuess(x));
        }
    }
    if x0 == x1 {
        return Err(Error::IdenticalGuesses(x0));
    }

    let mut trace = Trace::new();
    let mut fx = [0.0; 2];
    for (value, x) in fx.iter_mut().zip([x0, x1]) {
        *value = match evaluate(f, [x]) {
            Ok(v) => v,
            Err(err) => {
                let failure = Failure::NonFinite {
                    iter: 0,
                    x,
                    value: err.value,
                };
                return Ok(Solution::failed(failure, x, 0, trace));
            }
        };
    }

    let (mut x0, mut x1) = (x0, x1);
    let [mut fx0, mut fx1] = fx;
    let mut error = f64::NAN;

    for iter in 1..=config.max_iters() {
        let denominator = fx1 - fx0;
        if denominator == 0.0 {
            let failure = Failure::ZeroDenominator { iter, x0, x1 };
            return Ok(Solution::failed(failure, x1, iter - 1, trace));
        }

        let x2 = x1 - fx1 * (x1 - x0) / denominator;
        let fx2 = match evaluate(f, [x2]) {
            Ok(v) => v,
            Err(err) => {
                let failure = Failure::NonFinite {
                    iter,
                    x: x2,
                    value: err.value,
                };
                return Ok(Solution::failed(failure, x2, iter - 1, trace));
            }
        };

        error = if x2.abs() < RELATIVE_FLOOR {
            (x2 - x1).abs()
        } else {
            ((x2 - x1) / x2).abs()
        };

        let record = trace.push(Record {
            iter,
            x0,
            x1,
            fx0,
            fx1,
            x2,
            error,
        });

        let stop = observer.observe(record);
        (x0, fx0) = (x1, fx1);
        (x1, fx1) = (x2, fx2);

        if let Some(Action::StopEarly) = stop {
            return Ok(finish(Status::StoppedByObserver, x1, fx1, error, iter, trace));
        }
        if error < config.tolerance() {
            debug!(iter, root = x1, "secant converged");
            return Ok(finish(Status::Converged, x1, fx1, error, iter, trace));
        }
    }

    debug!(max_iters = config.max_iters(), "secant hit the iteration limit");
    Ok(finish(Status::MaxIters, x1, fx1, error, config.max_iters(), trace))
}

/// Finds a root of `f` by the secant method without observation.
///
/// # Errors
///
/// See [`solve`].
pub fn solve_unobserved<F: Function<1>>(
    f: &F,
    x0: f64,
    x1: f64,
    config: &Config,
) -> Result<Solution<Record>, Error> {
    solve(f, x0, x1, config, ())
}

fn finish(
    status: Status,
    x: f64,
    residual: f64,
    error: f64,
    iters: usize,
    trace: Trace<Record>,
) -> Solution<Record> {
    Solution {
        status,
        x,
        residual,
        error,
        iters,
        trace,
    }
}
