//! Numerical integration over a finite interval.
//!
//! - [`trapezoid`] and [`simpson`] — composite rules with a fixed panel count
//! - [`romberg`] — Richardson extrapolation of successively halved trapezoids
//!
//! The interval may be reversed (`a > b`), which flips the sign of the result.

mod error;

pub mod romberg;
pub mod simpson;
pub mod trapezoid;

pub use error::Error;

use numeth_core::{Function, evaluate};
use tracing::debug;

/// Largest panel count the composite rules accept.
pub const MAX_PANELS: usize = 1_000_000;

/// One evaluation node of a composite rule.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Sample {
    pub index: usize,
    pub x: f64,
    pub fx: f64,
    /// Rule weight before scaling by the step.
    pub weight: f64,
}

/// Result of a composite rule.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Quadrature {
    pub integral: f64,
    /// Panel width `(b - a) / n`, negative for a reversed interval.
    pub step: f64,
    pub panels: usize,
    pub samples: Vec<Sample>,
}

#[allow(clippy::float_cmp)]
fn validate_interval(a: f64, b: f64) -> Result<(), Error> {
    for bound in [a, b] {
        if !bound.is_finite() {
            return Err(Error::NonFiniteBound(bound));
        }
    }
    if a == b {
        return Err(Error::EmptyInterval(a));
    }
    Ok(())
}

fn validate_panels(n: usize) -> Result<(), Error> {
    if n == 0 || n > MAX_PANELS {
        return Err(Error::Panels { n, max: MAX_PANELS });
    }
    Ok(())
}

/// Evaluates a composite rule `scale * step * sum(weight(i) * f(x_i))`.
fn composite<F>(
    rule: &'static str,
    f: &F,
    a: f64,
    b: f64,
    n: usize,
    scale: f64,
    weight: impl Fn(usize) -> f64,
) -> Result<Quadrature, Error>
where
    F: Function<1>,
{
    let step = (b - a) / n as f64;
    let mut samples = Vec::with_capacity(n + 1);
    let mut sum = 0.0;

    for index in 0..=n {
        let x = if index == n { b } else { a + index as f64 * step };
        let fx = evaluate(f, [x]).map_err(|err| Error::NonFinite {
            x,
            value: err.value,
        })?;
        let weight = weight(index);
        sum += weight * fx;
        samples.push(Sample {
            index,
            x,
            fx,
            weight,
        });
    }

    let integral = scale * step * sum;
    debug!(rule, a, b, n, integral, "composite rule evaluated");

    Ok(Quadrature {
        integral,
        step,
        panels: n,
        samples,
    })
}
