//! Jacobi iteration.

use ndarray::Array1;
use numeth_core::Observer;

use super::{Action, Config, Error, LinearSystem, Record, Solution, iterate};

/// Solves `A x = b` by Jacobi iteration.
///
/// Each sweep computes every entry of the new iterate from the previous
/// iterate only. `x0` defaults to zeros.
///
/// # Observer
///
/// The observer receives each [`Record`] and may return [`Action::StopEarly`].
///
/// # Errors
///
/// Returns an error if `x0` has the wrong length or a non-finite entry.
pub fn solve<Obs>(
    system: &LinearSystem,
    x0: Option<&[f64]>,
    config: &Config,
    observer: Obs,
) -> Result<Solution, Error>
where
    Obs: Observer<Record, Action>,
{
    iterate("jacobi", system, x0, config, observer, sweep)
}

/// Solves `A x = b` by Jacobi iteration without observation.
///
/// # Errors
///
/// See [`solve`].
pub fn solve_unobserved(
    system: &LinearSystem,
    x0: Option<&[f64]>,
    config: &Config,
) -> Result<Solution, Error> {
    solve(system, x0, config, ())
}

fn sweep(system: &LinearSystem, x_old: &Array1<f64>, x_new: &mut Array1<f64>) {
    for i in 0..system.size() {
        x_new[i] = system.update(i, x_old);
    }
}
