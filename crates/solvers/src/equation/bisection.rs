//! Bisection on a bracketed interval.
//!
//! Each iteration halves the bracket, keeping the half whose endpoints still
//! straddle a sign change. Given a valid bracket the method always converges;
//! the error bound halves every step.

mod bracket;

pub use bracket::{BracketError, Bounds, Sign};

use bracket::Bracket;
use numeth_core::{Function, Observer, Trace, evaluate};
use tracing::debug;

use super::{Action, Config, Error, Failure, Solution, Status};

/// State of one bisection step.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Record {
    /// Iteration number, starting at 1.
    pub iter: usize,
    /// Lower bound of the bracket at the start of the step.
    pub xi: f64,
    /// Upper bound of the bracket at the start of the step.
    pub xu: f64,
    /// Midpoint.
    pub xr: f64,
    /// Function value at the midpoint.
    pub fxr: f64,
    /// Half the bracket width, `(xu - xi) / 2`.
    pub error: f64,
}

/// Finds a root of `f` inside `bracket` by bisection.
///
/// The endpoints may be given in either order. If `f` is within tolerance
/// of zero at an endpoint, that endpoint is returned as converged after
/// zero iterations.
///
/// The run converges when `|f(xr)| < tolerance` or the half width drops
/// below tolerance, whichever happens first.
///
/// # Observer
///
/// The observer receives each [`Record`] after it is appended to the trace
/// and may return [`Action::StopEarly`].
///
/// # Errors
///
/// Returns an error if the bracket is non-finite or has zero width, or if
/// `f` has the same sign at both endpoints.
pub fn solve<F, Obs>(
    f: &F,
    bracket: [f64; 2],
    config: &Config,
    mut observer: Obs,
) -> Result<Solution<Record>, Error>
where
    F: Function<1>,
    Obs: Observer<Record, Action>,
{
    let bounds = Bounds::new(bracket)?;
    let tol = config.tolerance();
    let mut trace = Trace::new();

    let mut endpoint_values = [0.0; 2];
    for (value, x) in endpoint_values.iter_mut().zip(bounds.as_array()) {
        *value = match evaluate(f, [x]) {
            Ok(fx) => fx,
            Err(err) => {
                let failure = Failure::NonFinite {
                    iter: 0,
                    x,
                    value: err.value,
                };
                return Ok(Solution::failed(failure, x, 0, trace));
            }
        };
        if value.abs() < tol {
            debug!(x, "bisection endpoint is already a root");
            return Ok(Solution {
                status: Status::Converged,
                x,
                residual: *value,
                error: 0.0,
                iters: 0,
                trace,
            });
        }
    }

    let [f_left, f_right] = endpoint_values;
    let Some(mut bracket) = Bracket::new(bounds, Sign::of(f_left), Sign::of(f_right)) else {
        return Err(Error::NoSignChange {
            left: bounds.left(),
            right: bounds.right(),
            f_left,
            f_right,
        });
    };

    let mut latest = (bracket.midpoint(), f64::NAN, bracket.half_width());

    for iter in 1..=config.max_iters() {
        let xr = bracket.midpoint();
        let error = bracket.half_width();
        let fxr = match evaluate(f, [xr]) {
            Ok(value) => value,
            Err(err) => {
                let failure = Failure::NonFinite {
                    iter,
                    x: xr,
                    value: err.value,
                };
                return Ok(Solution::failed(failure, xr, iter - 1, trace));
            }
        };

        let record = trace.push(Record {
            iter,
            xi: bracket.left(),
            xu: bracket.right(),
            xr,
            fxr,
            error,
        });
        latest = (xr, fxr, error);

        if let Some(Action::StopEarly) = observer.observe(record) {
            return Ok(finish(Status::StoppedByObserver, latest, iter, trace));
        }

        if fxr.abs() < tol || error < tol {
            debug!(iter, root = xr, "bisection converged");
            return Ok(finish(Status::Converged, latest, iter, trace));
        }

        bracket.shrink(xr, Sign::of(fxr));
    }

    debug!(max_iters = config.max_iters(), "bisection hit the iteration limit");
    Ok(finish(Status::MaxIters, latest, config.max_iters(), trace))
}

/// Finds a root of `f` inside `bracket` by bisection without observation.
///
/// # Errors
///
/// See [`solve`].
pub fn solve_unobserved<F: Function<1>>(
    f: &F,
    bracket: [f64; 2],
    config: &Config,
) -> Result<Solution<Record>, Error> {
    solve(f, bracket, config, ())
}

fn finish(
    status: Status,
    (x, residual, error): (f64, f64, f64),
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
