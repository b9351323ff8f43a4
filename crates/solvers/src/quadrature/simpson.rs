//! Composite Simpson's 1/3 rule.

use numeth_core::Function;

use super::{Error, Quadrature, composite, validate_interval, validate_panels};

/// Integrates `f` over `[a, b]` with `n` Simpson panels.
///
/// Weights are `1, 4, 2, 4, ..., 4, 1` scaled by `h / 3`.
///
/// # Errors
///
/// Returns an error if the interval or panel count is invalid, if `n` is
/// odd, or if `f` is not finite at a node.
pub fn integrate<F: Function<1>>(f: &F, a: f64, b: f64, n: usize) -> Result<Quadrature, Error> {
    validate_interval(a, b)?;
    validate_panels(n)?;
    if n % 2 != 0 {
        return Err(Error::OddPanels(n));
    }

    composite("simpson", f, a, b, n, 1.0 / 3.0, |i| {
        if i == 0 || i == n {
            1.0
        } else if i % 2 == 1 {
            4.0
        } else {
            2.0
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use numeth_core::from_fn;

    #[test]
    fn rejects_odd_and_accepts_even_panels() {
        let f = from_fn(|x: f64| x * x);
        assert_eq!(integrate(&f, 0.0, 1.0, 3).unwrap_err(), Error::OddPanels(3));

        let q = integrate(&f, 0.0, 1.0, 4).expect("should integrate");
        assert_eq!(q.panels, 4);
        let weights: Vec<f64> = q.samples.iter().map(|s| s.weight).collect();
        assert_eq!(weights, vec![1.0, 4.0, 2.0, 4.0, 1.0]);
    }

    #[test]
    fn exact_for_cubics() {
        let f = from_fn(|x: f64| x.powi(3) - 2.0 * x + 1.0);
        let q = integrate(&f, 0.0, 2.0, 2).expect("should integrate");
        assert_relative_eq!(q.integral, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn beats_trapezoid_on_smooth_integrand() {
        let f = from_fn(f64::exp);
        let exact = 1.0_f64.exp() - 1.0;
        let simpson = integrate(&f, 0.0, 1.0, 4).expect("should integrate");
        let trapezoid = crate::quadrature::trapezoid::integrate(&f, 0.0, 1.0, 4).expect("should integrate");

        assert!((simpson.integral - exact).abs() < (trapezoid.integral - exact).abs());
    }
}
