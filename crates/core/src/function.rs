use thiserror::Error;

/// A real-valued function of `N` real arguments.
///
/// Implementations must be pure: calling with the same arguments always
/// returns the same value. Non-finite results are allowed here and are
/// caught by [`evaluate`].
pub trait Function<const N: usize> {
    /// Calls the function at `args`.
    fn call(&self, args: &[f64; N]) -> f64;
}

impl<const N: usize, F: Function<N> + ?Sized> Function<N> for &F {
    fn call(&self, args: &[f64; N]) -> f64 {
        (**self).call(args)
    }
}

/// A [`Function`] backed by a closure.
///
/// Created by [`from_fn`].
#[derive(Debug, Clone, Copy)]
pub struct FromFn<F>(F);

/// Wraps a closure as a [`Function`].
///
/// Closures of one argument (`Fn(f64) -> f64`) become `Function<1>` and
/// closures of two arguments (`Fn(f64, f64) -> f64`) become `Function<2>`.
pub fn from_fn<F>(f: F) -> FromFn<F> {
    FromFn(f)
}

impl<F: Fn(f64) -> f64> Function<1> for FromFn<F> {
    fn call(&self, args: &[f64; 1]) -> f64 {
        (self.0)(args[0])
    }
}

impl<F: Fn(f64, f64) -> f64> Function<2> for FromFn<F> {
    fn call(&self, args: &[f64; 2]) -> f64 {
        (self.0)(args[0], args[1])
    }
}

/// A function produced a NaN or infinite value.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("non-finite value {value} at {args:?}")]
pub struct NonFinite {
    /// The arguments the function was called with.
    pub args: Vec<f64>,
    /// The offending value.
    pub value: f64,
}

/// Calls `f` at `args` and rejects NaN or infinite results.
///
/// # Errors
///
/// Returns [`NonFinite`] if the function value is not finite.
pub fn evaluate<const N: usize>(f: &impl Function<N>, args: [f64; N]) -> Result<f64, NonFinite> {
    let value = f.call(&args);
    if value.is_finite() {
        Ok(value)
    } else {
        Err(NonFinite {
            args: args.to_vec(),
            value,
        })
    }
}
