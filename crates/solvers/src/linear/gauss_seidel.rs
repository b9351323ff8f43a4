//! Gauss-Seidel iteration.

use ndarray::Array1;
use numeth_core::Observer;

use super::{Action, Config, Error, LinearSystem, Record, Solution, iterate};

/// Solves `A x = b` by Gauss-Seidel iteration.
///
/// Entries are overwritten in place during each sweep, in index order, so
/// later rows read the values already updated earlier in the same sweep.
/// `x0` defaults to zeros.
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
    iterate("gauss-seidel", system, x0, config, observer, sweep)
}

/// Solves `A x = b` by Gauss-Seidel iteration without observation.
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

fn sweep(system: &LinearSystem, _x_old: &Array1<f64>, x: &mut Array1<f64>) {
    for i in 0..system.size() {
        let value = system.update(i, x);
        x[i] = value;
    }
}
