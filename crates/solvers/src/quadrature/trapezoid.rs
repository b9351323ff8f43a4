//! Composite trapezoid rule.

use numeth_core::Function;

use super::{Error, Quadrature, composite, validate_interval, validate_panels};

/// Integrates `f` over `[a, b]` with `n` trapezoid panels.
///
/// Weights are `1, 2, ..., 2, 1` scaled by `h / 2`.
///
/// # Errors
///
/// Returns an error if the interval or panel count is invalid, or if `f`
/// is not finite at a node.
pub fn integrate<F: Function<1>>(f: &F, a: f64, b: f64, n: usize) -> Result<Quadrature, Error> {
    validate_interval(a, b)?;
    validate_panels(n)?;

    composite("trapezoid", f, a, b, n, 0.5, |i| {
        if i == 0 || i == n { 1.0 } else { 2.0 }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use numeth_core::from_fn;

    #[test]
    fn square_on_unit_interval_with_two_panels() {
        let f = from_fn(|x: f64| x * x);
        let q = integrate(&f, 0.0, 1.0, 2).expect("should integrate");

        assert_relative_eq!(q.integral, 0.375);
        assert_relative_eq!(q.step, 0.5);
        let weights: Vec<f64> = q.samples.iter().map(|s| s.weight).collect();
        assert_eq!(weights, vec![1.0, 2.0, 1.0]);
    }

    #[test]
    fn exact_for_linear_functions() {
        let f = from_fn(|x: f64| 3.0 * x + 1.0);
        let q = integrate(&f, -1.0, 2.0, 1).expect("should integrate");
        assert_relative_eq!(q.integral, 7.5);
    }

    #[test]
    fn error_shrinks_with_more_panels() {
        let f = from_fn(f64::sin);
        let exact = 2.0;
        let coarse = integrate(&f, 0.0, std::f64::consts::PI, 8).expect("should integrate");
        let fine = integrate(&f, 0.0, std::f64::consts::PI, 16).expect("should integrate");

        let ratio = (coarse.integral - exact).abs() / (fine.integral - exact).abs();
        assert_relative_eq!(ratio, 4.0, epsilon = 0.05);
    }

    #[test]
    fn reversed_interval_flips_sign() {
        let f = from_fn(|x: f64| x * x);
        let forward = integrate(&f, 0.0, 1.0, 10).expect("should integrate");
        let backward = integrate(&f, 1.0, 0.0, 10).expect("should integrate");
        assert_relative_eq!(forward.integral, -backward.integral, epsilon = 1e-14);
    }

    #[test]
    fn rejects_zero_panels() {
        let f = from_fn(|x: f64| x);
        assert!(matches!(
            integrate(&f, 0.0, 1.0, 0),
            Err(Error::Panels { n: 0, .. })
        ));
    }
}
