//! Stationary iterative solvers for square linear systems `A x = b`.
//!
//! - [`jacobi`] — every update reads only the previous iterate
//! - [`gauss_seidel`] — updates are written in place during the sweep
//!
//! Both share the same loop: sweep, measure the Euclidean norm of the
//! change, record, and stop once the change drops below tolerance.

mod error;
mod solution;
mod system;

pub mod gauss_seidel;
pub mod jacobi;

pub use error::Error;
pub use solution::{Action, Record, Solution, Status};
pub use system::{LinearSystem, SystemError};

pub use crate::Config;

use ndarray::{Array1, ArrayView1};
use numeth_core::{Observer, Trace};
use tracing::{debug, warn};

/// Builds the starting iterate: `x0` if given, zeros otherwise.
fn initial_guess(system: &LinearSystem, x0: Option<&[f64]>) -> Result<Array1<f64>, Error> {
    let n = system.size();
    match x0 {
        None => Ok(Array1::zeros(n)),
        Some(x0) if x0.len() != n => Err(Error::GuessLength {
            expected: n,
            found: x0.len(),
        }),
        Some(x0) => {
            if let Some(index) = x0.iter().position(|v| !v.is_finite()) {
                return Err(Error::NonFiniteGuess { index });
            }
            Ok(Array1::from(x0.to_vec()))
        }
    }
}

fn distance(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(a, b)| (a - b).powi(2))
        .sum::<f64>()
        .sqrt()
}

/// Runs a stationary iteration with the given sweep.
///
/// The sweep receives the previous iterate and the buffer for the next one,
/// which starts as a copy of the previous iterate.
fn iterate<Obs>(
    method: &'static str,
    system: &LinearSystem,
    x0: Option<&[f64]>,
    config: &Config,
    mut observer: Obs,
    sweep: impl Fn(&LinearSystem, &Array1<f64>, &mut Array1<f64>),
) -> Result<Solution, Error>
where
    Obs: Observer<Record, Action>,
{
    let mut x = initial_guess(system, x0)?;
    let diagonally_dominant = system.is_diagonally_dominant();
    if !diagonally_dominant {
        warn!(method, "matrix is not diagonally dominant; convergence is not guaranteed");
    }

    let mut trace = Trace::with_capacity(config.max_iters().min(64));
    let mut error = f64::NAN;

    for iter in 1..=config.max_iters() {
        let mut x_new = x.clone();
        sweep(system, &x, &mut x_new);

        if x_new.iter().any(|v| !v.is_finite()) {
            debug!(method, iter, "iterate became non-finite");
            return Ok(Solution {
                status: Status::Diverged { iter },
                x: x.to_vec(),
                error,
                iters: iter - 1,
                diagonally_dominant,
                trace,
            });
        }

        error = distance(x_new.view(), x.view());
        let record = trace.push(Record {
            iter,
            x_old: x.to_vec(),
            x_new: x_new.to_vec(),
            error,
        });
        let stop = observer.observe(record);
        x = x_new;

        let status = if error < config.tolerance() {
            debug!(method, iter, error, "linear iteration converged");
            Status::Converged
        } else if let Some(Action::StopEarly) = stop {
            Status::StoppedByObserver
        } else {
            continue;
        };

        return Ok(Solution {
            status,
            x: x.to_vec(),
            error,
            iters: iter,
            diagonally_dominant,
            trace,
        });
    }

    debug!(method, max_iters = config.max_iters(), "linear iteration hit the iteration limit");
    Ok(Solution {
        status: Status::MaxIters,
        x: x.to_vec(),
        error,
        iters: config.max_iters(),
        diagonally_dominant,
        trace,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use ndarray::array;

    fn system() -> LinearSystem {
        LinearSystem::new(vec![vec![4.0, 1.0], vec![2.0, 3.0]], vec![1.0, 2.0])
            .expect("valid system")
    }

    #[test]
    fn initial_guess_defaults_to_zeros() {
        let x = initial_guess(&system(), None).expect("valid guess");
        assert_eq!(x, array![0.0, 0.0]);
    }

    #[test]
    fn initial_guess_is_validated() {
        assert_eq!(
            initial_guess(&system(), Some(&[1.0])),
            Err(Error::GuessLength {
                expected: 2,
                found: 1
            })
        );
        assert_eq!(
            initial_guess(&system(), Some(&[1.0, f64::NAN])),
            Err(Error::NonFiniteGuess { index: 1 })
        );
    }

    #[test]
    fn distance_is_euclidean() {
        let a = array![1.0, 2.0];
        let b = array![4.0, 6.0];
        assert_relative_eq!(distance(a.view(), b.view()), 5.0);
    }
}
