/// Input errors that prevent Euler integration from starting.
#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq)]
pub enum Error {
    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },

    #[error("step size must be positive, got {0}")]
    StepSize(f64),

    #[error("x_final ({x_final}) must be greater than x0 ({x0})")]
    Interval { x0: f64, x_final: f64 },

    #[error("integration needs {steps} steps, more than the limit of {max}")]
    TooManySteps { steps: f64, max: usize },
}
