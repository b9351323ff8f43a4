use std::{fmt, str::FromStr};

use numeth_solvers::{
    Config,
    quadrature::{MAX_PANELS, romberg::MAX_ROWS},
};
use serde::Serialize;
use thiserror::Error;

use crate::schema::{Field, Kind, Schema};

/// A numerical method reachable through [`solve`](crate::solve).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Method {
    Bisection,
    Secant,
    NewtonRaphson,
    FixedPoint,
    Jacobi,
    GaussSeidel,
    Trapezoid,
    Simpson,
    Romberg,
    Euler,
}

/// The method name did not match any [`Method`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown method {0:?}")]
pub struct UnknownMethod(pub String);

const TOLERANCE: Field = Field::defaulted("tolerance", Kind::Positive, 1e-6);
const MAX_ITERATIONS: Field = Field::defaulted(
    "max_iterations",
    Kind::Integer {
        min: 1,
        max: Config::MAX_ITERS,
    },
    100.0,
);

const BISECTION: &[Field] = &[
    Field::required("function", Kind::Expression),
    Field::required("xi", Kind::Number),
    Field::required("xu", Kind::Number),
    TOLERANCE,
    MAX_ITERATIONS,
];

const SECANT: &[Field] = &[
    Field::required("function", Kind::Expression),
    Field::required("x0", Kind::Number),
    Field::required("x1", Kind::Number),
    TOLERANCE,
    MAX_ITERATIONS,
];

const NEWTON_RAPHSON: &[Field] = &[
    Field::required("function", Kind::Expression),
    Field::required("x0", Kind::Number),
    TOLERANCE,
    MAX_ITERATIONS,
];

const FIXED_POINT: &[Field] = &[
    Field::required("function", Kind::Expression),
    Field::required("x0", Kind::Number),
    TOLERANCE,
    MAX_ITERATIONS,
];

const LINEAR: &[Field] = &[
    Field::required("A", Kind::Matrix),
    Field::required("b", Kind::Vector),
    Field::optional("x0", Kind::Vector),
    TOLERANCE,
    MAX_ITERATIONS,
];

const COMPOSITE: &[Field] = &[
    Field::required("function", Kind::Expression),
    Field::required("a", Kind::Number),
    Field::required("b", Kind::Number),
    Field::required(
        "n",
        Kind::Integer {
            min: 1,
            max: MAX_PANELS,
        },
    ),
];

const ROMBERG: &[Field] = &[
    Field::required("function", Kind::Expression),
    Field::required("a", Kind::Number),
    Field::required("b", Kind::Number),
    TOLERANCE,
    Field::defaulted(
        "max_iterations",
        Kind::Integer {
            min: 1,
            max: MAX_ROWS,
        },
        10.0,
    ),
];

const EULER: &[Field] = &[
    Field::required("function", Kind::Expression),
    Field::required("x0", Kind::Number),
    Field::required("y0", Kind::Number),
    Field::required("h", Kind::Positive),
    Field::required("x_final", Kind::Number),
];

/// Fields of the standalone derivative operation.
pub(crate) const DERIVATIVE: Schema = Schema {
    name: "derivative",
    fields: &[
        Field::required("function", Kind::Expression),
        Field::optional("variable", Kind::Variable),
    ],
};

impl Method {
    /// Every method, in presentation order.
    pub const ALL: [Method; 10] = [
        Method::Bisection,
        Method::Secant,
        Method::NewtonRaphson,
        Method::FixedPoint,
        Method::Jacobi,
        Method::GaussSeidel,
        Method::Trapezoid,
        Method::Simpson,
        Method::Romberg,
        Method::Euler,
    ];

    /// Returns the kebab-case name used in routes and responses.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Method::Bisection => "bisection",
            Method::Secant => "secant",
            Method::NewtonRaphson => "newton-raphson",
            Method::FixedPoint => "fixed-point",
            Method::Jacobi => "jacobi",
            Method::GaussSeidel => "gauss-seidel",
            Method::Trapezoid => "trapezoid",
            Method::Simpson => "simpson",
            Method::Romberg => "romberg",
            Method::Euler => "euler",
        }
    }

    /// Returns the parameter schema for this method.
    #[must_use]
    pub fn schema(self) -> Schema {
        let fields = match self {
            Method::Bisection => BISECTION,
            Method::Secant => SECANT,
            Method::NewtonRaphson => NEWTON_RAPHSON,
            Method::FixedPoint => FIXED_POINT,
            Method::Jacobi | Method::GaussSeidel => LINEAR,
            Method::Trapezoid | Method::Simpson => COMPOSITE,
            Method::Romberg => ROMBERG,
            Method::Euler => EULER,
        };
        Schema {
            name: self.name(),
            fields,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Method {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .into_iter()
            .find(|method| method.name() == s)
            .ok_or_else(|| UnknownMethod(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for method in Method::ALL {
            assert_eq!(method.name().parse::<Method>(), Ok(method));
        }
    }

    #[test]
    fn unknown_names_are_rejected() {
        assert_eq!(
            "gauss-sediel".parse::<Method>(),
            Err(UnknownMethod("gauss-sediel".to_owned()))
        );
        assert!("Bisection".parse::<Method>().is_err());
    }

    #[test]
    fn serializes_as_kebab_case() {
        let value = serde_json::to_value(Method::NewtonRaphson).expect("serializable");
        assert_eq!(value, serde_json::json!("newton-raphson"));
    }

    #[test]
    fn every_expression_method_requires_a_function() {
        for method in Method::ALL {
            let schema = method.schema();
            let has_function = schema.fields.iter().any(|field| field.name == "function");
            let is_linear = matches!(method, Method::Jacobi | Method::GaussSeidel);
            assert_eq!(has_function, !is_linear, "{method}");
        }
    }
}
