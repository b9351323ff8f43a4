use numeth_expr::ParseError;
use numeth_solvers::{ConfigError, equation, linear, quadrature, transient::euler};
use thiserror::Error;

use crate::{ParamError, UnknownMethod};

/// A request the service could not run.
///
/// Every variant except a non-finite quadrature sample is an input problem;
/// solver runs that fail to converge are reported in the response body instead.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    UnknownMethod(#[from] UnknownMethod),

    #[error("invalid parameters: {0}")]
    Params(#[from] ParamError),

    #[error("invalid expression in `{field}`: {source}")]
    Expression {
        field: &'static str,
        #[source]
        source: ParseError,
    },

    #[error("invalid solver settings: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Equation(#[from] equation::Error),

    #[error(transparent)]
    Linear(#[from] linear::Error),

    #[error(transparent)]
    Quadrature(#[from] quadrature::Error),

    #[error(transparent)]
    Euler(#[from] euler::Error),

    #[error("failed to render response: {0}")]
    Render(#[from] serde_json::Error),
}

impl ServiceError {
    /// Returns a stable machine-readable category.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::UnknownMethod(_) => "unknown_method",
            ServiceError::Params(_) => "invalid_parameters",
            ServiceError::Expression { .. } => "invalid_expression",
            ServiceError::Quadrature(quadrature::Error::NonFinite { .. }) => "evaluation",
            ServiceError::Config(_)
            | ServiceError::Equation(_)
            | ServiceError::Linear(_)
            | ServiceError::Quadrature(_)
            | ServiceError::Euler(_) => "invalid_input",
            ServiceError::Render(_) => "internal",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_finite_samples_are_evaluation_errors() {
        let err = ServiceError::from(quadrature::Error::NonFinite {
            x: 0.0,
            value: f64::INFINITY,
        });
        assert_eq!(err.kind(), "evaluation");

        let err = ServiceError::from(quadrature::Error::OddPanels(3));
        assert_eq!(err.kind(), "invalid_input");
    }
}
