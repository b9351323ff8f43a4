//! Fixed-point iteration `x = g(x)`.
//!
//! Converges when `g` is a contraction near the fixed point. That property
//! is not checked up front; a run that never settles ends with
//! [`Status::MaxIters`].

use numeth_core::{Function, Observer, Trace, evaluate};
use tracing::debug;

use super::{Action, Config, Error, Failure, Solution, Status};

/// State of one fixed-point step.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Record {
    pub iter: usize,
    pub x: f64,
    pub gx: f64,
    /// `|g(x) - x|`.
    pub error: f64,
}

/// Iterates `x = g(x)` from `x0` until successive iterates agree.
///
/// The solution's `residual` is `g(x) - x` from the last step.
///
/// # Errors
///
/// Returns an error if `x0` is not finite.
pub fn solve<G, Obs>(
    g: &G,
    x0: f64,
    config: &Config,
    mut observer: Obs,
) -> Result<Solution<Record>, Error>
where
    G: Function<1>,
    Obs: Observer<Record, Action>,
{
    if !x0.is_finite() {
        return Err(Error::NonFiniteGuess(x0));
    }

    let mut trace = Trace::new();
    let mut x = x0;
    let mut residual = f64::NAN;
    let mut error = f64::NAN;

    for iter in 1..=config.max_iters() {
        let gx = match evaluate(g, [x]) {
            Ok(v) => v,
            Err(err) => {
                let failure = Failure::NonFinite {
                    iter,
                    x,
                    value: err.value,
                };
                return Ok(Solution::failed(failure, x, iter - 1, trace));
            }
        };
        residual = gx - x;
        error = residual.abs();

        let record = trace.push(Record { iter, x, gx, error });
        let stop = observer.observe(record);
        x = gx;

        let status = if error < config.tolerance() {
            debug!(iter, fixed_point = x, "fixed-point iteration converged");
            Status::Converged
        } else if let Some(Action::StopEarly) = stop {
            Status::StoppedByObserver
        } else {
            continue;
        };

        return Ok(Solution {
            status,
            x,
            residual,
            error,
            iters: iter,
            trace,
        });
    }

    debug!(max_iters = config.max_iters(), "fixed-point iteration hit the iteration limit");
    Ok(Solution {
        status: Status::MaxIters,
        x,
        residual,
        error,
        iters: config.max_iters(),
        trace,
    })
}

/// Iterates `x = g(x)` from `x0` without observation.
///
/// # Errors
///
/// See [`solve`].
pub fn solve_unobserved<G: Function<1>>(
    g: &G,
    x0: f64,
    config: &Config,
) -> Result<Solution<Record>, Error> {
    solve(g, x0, config, ())
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use numeth_core::from_fn;

    fn config(max_iters: usize, tolerance: f64) -> Config {
        Config::new(max_iters, tolerance).expect("valid config")
    }

    #[test]
    fn cosine_fixed_point() {
        let g = from_fn(f64::cos);
        let solution = solve_unobserved(&g, 1.0, &config(200, 1e-10)).expect("should solve");

        assert_eq!(solution.status, Status::Converged);
        assert_relative_eq!(solution.x, 0.739_085_133_2, epsilon = 1e-9);
        assert!(solution.residual.abs() < 1e-10);
    }

    #[test]
    fn records_chain_iterates() {
        let g = from_fn(|x: f64| 0.5 * x + 1.0);
        let solution = solve_unobserved(&g, 0.0, &config(100, 1e-8)).expect("should solve");

        assert_relative_eq!(solution.x, 2.0, epsilon = 1e-7);
        let first = &solution.trace[0];
        assert_relative_eq!(first.x, 0.0);
        assert_relative_eq!(first.gx, 1.0);
        assert_relative_eq!(first.error, 1.0);
        for pair in solution.trace.as_slice().windows(2) {
            assert_relative_eq!(pair[1].x, pair[0].gx);
            assert_eq!(pair[1].iter, pair[0].iter + 1);
        }
    }

    #[test]
    fn expanding_map_does_not_converge() {
        let g = from_fn(|x: f64| 2.0 * x + 1.0);
        let solution = solve_unobserved(&g, 0.0, &config(20, 1e-6)).expect("should run");

        assert_eq!(solution.status, Status::MaxIters);
        assert_eq!(solution.trace.len(), 20);
    }

    #[test]
    fn overflow_is_a_non_finite_failure() {
        let g = from_fn(|x: f64| x * x);
        let solution = solve_unobserved(&g, 10.0, &config(100, 1e-6)).expect("should run");

        assert!(matches!(
            solution.status,
            Status::Failed(Failure::NonFinite { .. })
        ));
        assert_eq!(solution.iters, solution.trace.len());
    }

    #[test]
    fn rejects_non_finite_guess() {
        let g = from_fn(f64::cos);
        assert_eq!(
            solve_unobserved(&g, f64::NAN, &config(10, 1e-6))
                .unwrap_err()
                .to_string(),
            "initial guess must be finite, got NaN"
        );
    }
}
