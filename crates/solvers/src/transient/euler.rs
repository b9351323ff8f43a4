//! Forward Euler for first-order ODEs `y' = f(x, y)`.
//!
//! ```text
//! y_{k+1} = y_k + h * f(x_k, y_k)
//! ```
//!
//! Nodes are computed as `x_k = x0 + k * h` so that rounding does not
//! accumulate across steps.

mod error;
mod solution;

pub use error::Error;
pub use solution::{Action, Solution, Status, Step};

use numeth_core::{Function, Observer, Trace, evaluate};
use tracing::debug;

/// Largest number of steps a run may take.
pub const MAX_STEPS: usize = 100_000;

/// Relative slack applied to the step quotient before flooring.
const STEP_SLACK: f64 = 1e-9;

/// Integrates `y' = f(x, y)` from `(x0, y0)` towards `x_final` with step `h`.
///
/// The number of steps is `floor((x_final - x0) / h)`, taken with a relative
/// slack of `1e-9` so that rounding in the quotient does not drop a step. The
/// last node may fall short of `x_final` when `h` does not divide the interval.
///
/// # Observer
///
/// The observer receives each [`Step`] and may return [`Action::StopEarly`].
///
/// # Errors
///
/// Returns an error if an input is non-finite, `h` is not positive,
/// `x_final <= x0`, or the step count exceeds [`MAX_STEPS`].
pub fn solve<F, Obs>(
    f: &F,
    x0: f64,
    y0: f64,
    h: f64,
    x_final: f64,
    mut observer: Obs,
) -> Result<Solution, Error>
where
    F: Function<2>,
    Obs: Observer<Step, Action>,
{
    let steps = step_count(x0, y0, h, x_final)?;

    let mut trace = Trace::with_capacity(steps);
    let mut x = x0;
    let mut y = y0;

    for step in 1..=steps {
        let slope = match evaluate(f, [x, y]) {
            Ok(slope) => slope,
            Err(err) => {
                let status = Status::Failed {
                    step,
                    x,
                    y,
                    value: err.value,
                };
                return Ok(Solution::new(status, x, y, step - 1, trace));
            }
        };

        let y_next = y + h * slope;
        if !y_next.is_finite() {
            let status = Status::Failed {
                step,
                x,
                y,
                value: y_next,
            };
            return Ok(Solution::new(status, x, y, step - 1, trace));
        }

        let record = trace.push(Step {
            step,
            x,
            y,
            slope,
            y_next,
        });
        let stop = observer.observe(record);

        x = x0 + step as f64 * h;
        y = y_next;

        if let Some(Action::StopEarly) = stop {
            return Ok(Solution::new(Status::StoppedByObserver, x, y, step, trace));
        }
    }

    debug!(steps, x, y, "euler integration complete");
    Ok(Solution::new(Status::Complete, x, y, steps, trace))
}

/// Integrates `y' = f(x, y)` without observation.
///
/// # Errors
///
/// See [`solve`].
pub fn solve_unobserved<F: Function<2>>(
    f: &F,
    x0: f64,
    y0: f64,
    h: f64,
    x_final: f64,
) -> Result<Solution, Error> {
    solve(f, x0, y0, h, x_final, ())
}

fn step_count(x0: f64, y0: f64, h: f64, x_final: f64) -> Result<usize, Error> {
    for (name, value) in [("x0", x0), ("y0", y0), ("h", h), ("x_final", x_final)] {
        if !value.is_finite() {
            return Err(Error::NonFinite { name, value });
        }
    }
    if h <= 0.0 {
        return Err(Error::StepSize(h));
    }
    if x_final <= x0 {
        return Err(Error::Interval { x0, x_final });
    }

    // Slack absorbs quotients like 0.3 / 0.1 = 2.9999999999999996.
    let steps = ((x_final - x0) / h * (1.0 + STEP_SLACK)).floor();
    if steps > MAX_STEPS as f64 {
        return Err(Error::TooManySteps {
            steps,
            max: MAX_STEPS,
        });
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let steps = steps as usize;
    Ok(steps)
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use numeth_core::from_fn;
    use numeth_expr::{Variable, compile};

    #[test]
    fn exponential_growth() {
        let f = from_fn(|_x: f64, y: f64| y);
        let solution = solve_unobserved(&f, 0.0, 1.0, 0.1, 1.0).expect("should solve");

        assert_eq!(solution.status, Status::Complete);
        assert_eq!(solution.steps, 10);
        assert_relative_eq!(solution.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(solution.y, 1.1_f64.powi(10), epsilon = 1e-12);
    }

    #[test]
    fn records_each_step() {
        let f = compile("x + y", &[Variable::X, Variable::Y]).expect("valid expression");
        let solution = solve_unobserved(&f, 0.0, 1.0, 0.5, 1.0).expect("should solve");

        assert_eq!(solution.trace.len(), 2);
        let first = &solution.trace[0];
        assert_eq!(first.step, 1);
        assert_relative_eq!(first.slope, 1.0);
        assert_relative_eq!(first.y_next, 1.5);

        let second = &solution.trace[1];
        assert_relative_eq!(second.x, 0.5);
        assert_relative_eq!(second.y, 1.5);
        assert_relative_eq!(second.slope, 2.0);
        assert_relative_eq!(second.y_next, 2.5);
    }

    #[test]
    fn rejects_bad_inputs() {
        let f = from_fn(|_x: f64, y: f64| y);
        assert_eq!(
            solve_unobserved(&f, 0.0, 1.0, 0.0, 1.0).unwrap_err(),
            Error::StepSize(0.0)
        );
        assert_eq!(
            solve_unobserved(&f, 1.0, 1.0, 0.1, 1.0).unwrap_err(),
            Error::Interval {
                x0: 1.0,
                x_final: 1.0
            }
        );
        assert!(matches!(
            solve_unobserved(&f, 0.0, f64::NAN, 0.1, 1.0),
            Err(Error::NonFinite { name: "y0", .. })
        ));
        assert!(matches!(
            solve_unobserved(&f, 0.0, 1.0, 1e-6, 1.0),
            Err(Error::TooManySteps { .. })
        ));
    }

    #[test]
    fn step_count_tolerates_rounding() {
        let f = from_fn(|_x: f64, _y: f64| 1.0);
        let solution = solve_unobserved(&f, 0.0, 0.0, 0.1, 0.3).expect("should solve");

        assert_eq!(solution.steps, 3);
        assert_relative_eq!(solution.x, 0.3, epsilon = 1e-12);

        let solution = solve_unobserved(&f, 0.0, 0.0, 0.4, 1.0).expect("should solve");
        assert_eq!(solution.steps, 2);
    }

    #[test]
    fn blow_up_is_a_failure() {
        let f = from_fn(|_x: f64, y: f64| y * y);
        let solution = solve_unobserved(&f, 0.0, 1.0, 0.5, 100.0).expect("should run");

        assert!(matches!(solution.status, Status::Failed { .. }));
        assert_eq!(solution.steps, solution.trace.len());
        assert!(solution.y.is_finite());
    }

    #[test]
    fn observer_can_stop_early() {
        let f = from_fn(|_x: f64, _y: f64| 1.0);
        let observer = |step: &Step| (step.step == 3).then_some(Action::StopEarly);
        let solution = solve(&f, 0.0, 0.0, 0.1, 1.0, observer).expect("should run");

        assert_eq!(solution.status, Status::StoppedByObserver);
        assert_eq!(solution.steps, 3);
        assert_relative_eq!(solution.y, 0.3, epsilon = 1e-12);
    }
}
