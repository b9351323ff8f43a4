//! Declarative request validation.
//!
//! Each [`Method`] publishes a [`Schema`]: a list of [`Field`]s naming the
//! parameter, its [`Kind`] and whether it is required. Validation turns a
//! JSON object into typed [`Params`] before any solver runs, so solvers never
//! see malformed input.

use std::collections::BTreeMap;

use numeth_expr::Variable;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// The expected type and range of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Kind {
    /// Expression text.
    Expression,
    /// A variable name, `x` or `y`.
    Variable,
    /// A finite real number.
    Number,
    /// A finite real number greater than zero.
    Positive,
    /// A whole number in `min..=max`.
    Integer { min: usize, max: usize },
    /// A non-empty array of finite numbers.
    Vector,
    /// A non-empty array of arrays of finite numbers.
    Matrix,
}

/// Whether a parameter may be omitted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Requirement {
    Required,
    Optional,
    Default(f64),
}

/// One parameter of a method.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Field {
    pub name: &'static str,
    pub kind: Kind,
    pub requirement: Requirement,
}

impl Field {
    #[must_use]
    pub const fn required(name: &'static str, kind: Kind) -> Self {
        Self {
            name,
            kind,
            requirement: Requirement::Required,
        }
    }

    #[must_use]
    pub const fn optional(name: &'static str, kind: Kind) -> Self {
        Self {
            name,
            kind,
            requirement: Requirement::Optional,
        }
    }

    #[must_use]
    pub const fn defaulted(name: &'static str, kind: Kind, default: f64) -> Self {
        Self {
            name,
            kind,
            requirement: Requirement::Default(default),
        }
    }

    fn parse(&self, value: &Value) -> Result<Param, ParamError> {
        let name = self.name;
        match self.kind {
            Kind::Expression => {
                let text = value.as_str().ok_or(ParamError::WrongType {
                    field: name,
                    expected: "an expression string",
                })?;
                let text = text.trim();
                if text.is_empty() {
                    return Err(ParamError::Empty(name));
                }
                Ok(Param::Text(text.to_owned()))
            }
            Kind::Variable => value
                .as_str()
                .and_then(|text| Variable::from_name(text.trim()))
                .map(Param::Variable)
                .ok_or(ParamError::WrongType {
                    field: name,
                    expected: "\"x\" or \"y\"",
                }),
            Kind::Number => number(name, value).map(Param::Number),
            Kind::Positive => {
                let value = number(name, value)?;
                if value <= 0.0 {
                    return Err(ParamError::OutOfRange {
                        field: name,
                        detail: format!("greater than 0, got {value}"),
                    });
                }
                Ok(Param::Number(value))
            }
            Kind::Integer { min, max } => integer(name, value, min, max).map(Param::Integer),
            Kind::Vector => {
                let vector = vector(name, value)?;
                if vector.is_empty() {
                    return Err(ParamError::Empty(name));
                }
                Ok(Param::Vector(vector))
            }
            Kind::Matrix => {
                let rows = value.as_array().ok_or(ParamError::WrongType {
                    field: name,
                    expected: "an array of rows",
                })?;
                if rows.is_empty() {
                    return Err(ParamError::Empty(name));
                }
                let matrix = rows
                    .iter()
                    .map(|row| vector(name, row))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Param::Matrix(matrix))
            }
        }
    }

    fn default_param(&self) -> Option<Param> {
        let Requirement::Default(default) = self.requirement else {
            return None;
        };
        Some(match self.kind {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            Kind::Integer { .. } => Param::Integer(default as usize),
            _ => Param::Number(default),
        })
    }
}

/// The parameter schema of one operation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Schema {
    /// Method or operation name.
    pub name: &'static str,
    pub fields: &'static [Field],
}

impl Schema {
    /// Validates a JSON request body against the schema.
    ///
    /// `null` counts as absent. Fields not named in the schema are ignored.
    ///
    /// # Errors
    ///
    /// Returns the first problem found, in field order.
    pub fn validate(&self, body: &Value) -> Result<Params, ParamError> {
        let object = body.as_object().ok_or(ParamError::NotAnObject)?;
        let mut values = BTreeMap::new();

        for field in self.fields {
            match object.get(field.name).filter(|value| !value.is_null()) {
                Some(value) => {
                    values.insert(field.name, field.parse(value)?);
                }
                None if field.requirement == Requirement::Required => {
                    return Err(ParamError::Missing(field.name));
                }
                None => {
                    if let Some(param) = field.default_param() {
                        values.insert(field.name, param);
                    }
                }
            }
        }

        Ok(Params { values })
    }
}

/// A request parameter that failed validation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParamError {
    #[error("request body must be a JSON object")]
    NotAnObject,

    #[error("missing required field `{0}`")]
    Missing(&'static str),

    #[error("field `{0}` must not be empty")]
    Empty(&'static str),

    #[error("field `{field}` must be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("field `{0}` must be finite")]
    NotFinite(&'static str),

    #[error("field `{field}` must be {detail}")]
    OutOfRange { field: &'static str, detail: String },
}

#[derive(Debug, Clone, PartialEq)]
enum Param {
    Text(String),
    Variable(Variable),
    Number(f64),
    Integer(usize),
    Vector(Vec<f64>),
    Matrix(Vec<Vec<f64>>),
}

/// Validated, typed parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Params {
    values: BTreeMap<&'static str, Param>,
}

impl Params {
    fn get(&self, name: &'static str) -> Result<&Param, ParamError> {
        self.values.get(name).ok_or(ParamError::Missing(name))
    }

    fn mismatch(name: &'static str, expected: &'static str) -> ParamError {
        ParamError::WrongType {
            field: name,
            expected,
        }
    }

    /// Returns an expression string.
    ///
    /// # Errors
    ///
    /// Returns an error if the field is absent or not an expression.
    pub fn expression(&self, name: &'static str) -> Result<&str, ParamError> {
        match self.get(name)? {
            Param::Text(text) => Ok(text),
            _ => Err(Self::mismatch(name, "an expression string")),
        }
    }

    /// Returns a variable, if given.
    #[must_use]
    pub fn variable(&self, name: &'static str) -> Option<Variable> {
        match self.values.get(name) {
            Some(Param::Variable(var)) => Some(*var),
            _ => None,
        }
    }

    /// Returns a number.
    ///
    /// # Errors
    ///
    /// Returns an error if the field is absent or not a number.
    pub fn number(&self, name: &'static str) -> Result<f64, ParamError> {
        match self.get(name)? {
            Param::Number(value) => Ok(*value),
            _ => Err(Self::mismatch(name, "a number")),
        }
    }

    /// Returns a whole number.
    ///
    /// # Errors
    ///
    /// Returns an error if the field is absent or not an integer.
    pub fn integer(&self, name: &'static str) -> Result<usize, ParamError> {
        match self.get(name)? {
            Param::Integer(value) => Ok(*value),
            _ => Err(Self::mismatch(name, "an integer")),
        }
    }

    /// Returns a vector, if given.
    ///
    /// # Errors
    ///
    /// Returns an error if the field holds something other than a vector.
    pub fn optional_vector(&self, name: &'static str) -> Result<Option<&[f64]>, ParamError> {
        match self.values.get(name) {
            None => Ok(None),
            Some(Param::Vector(values)) => Ok(Some(values)),
            Some(_) => Err(Self::mismatch(name, "an array of numbers")),
        }
    }

    /// Returns a vector.
    ///
    /// # Errors
    ///
    /// Returns an error if the field is absent or not a vector.
    pub fn vector(&self, name: &'static str) -> Result<&[f64], ParamError> {
        self.optional_vector(name)?.ok_or(ParamError::Missing(name))
    }

    /// Returns a matrix as rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the field is absent or not a matrix.
    pub fn matrix(&self, name: &'static str) -> Result<&[Vec<f64>], ParamError> {
        match self.get(name)? {
            Param::Matrix(rows) => Ok(rows),
            _ => Err(Self::mismatch(name, "an array of rows")),
        }
    }
}

/// Reads a finite number given as a JSON number or a numeric string.
fn number(field: &'static str, value: &Value) -> Result<f64, ParamError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    let number = parsed.ok_or(ParamError::WrongType {
        field,
        expected: "a number",
    })?;
    if !number.is_finite() {
        return Err(ParamError::NotFinite(field));
    }
    Ok(number)
}

fn integer(field: &'static str, value: &Value, min: usize, max: usize) -> Result<usize, ParamError> {
    let number = number(field, value)?;
    let out_of_range = || ParamError::OutOfRange {
        field,
        detail: format!("a whole number between {min} and {max}, got {number}"),
    };
    if number.fract() != 0.0 || number < min as f64 || number > max as f64 {
        return Err(out_of_range());
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let whole = number as usize;
    Ok(whole)
}

fn vector(field: &'static str, value: &Value) -> Result<Vec<f64>, ParamError> {
    value
        .as_array()
        .ok_or(ParamError::WrongType {
            field,
            expected: "an array of numbers",
        })?
        .iter()
        .map(|entry| number(field, entry))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use serde_json::json;

    use crate::Method;

    fn bisection(body: Value) -> Result<Params, ParamError> {
        Method::Bisection.schema().validate(&body)
    }

    #[test]
    fn applies_defaults() {
        let params = bisection(json!({"function": "x^2 - 4", "xi": 0, "xu": 3})).expect("valid");

        assert_eq!(params.expression("function"), Ok("x^2 - 4"));
        assert_relative_eq!(params.number("tolerance").expect("defaulted"), 1e-6);
        assert_eq!(params.integer("max_iterations"), Ok(100));
    }

    #[test]
    fn accepts_numeric_strings() {
        let params = bisection(json!({
            "function": "x",
            "xi": "-1.5",
            "xu": " 2 ",
            "tolerance": "1e-8",
            "max_iterations": "50",
        }))
        .expect("valid");

        assert_eq!(params.number("xi"), Ok(-1.5));
        assert_eq!(params.number("xu"), Ok(2.0));
        assert_eq!(params.integer("max_iterations"), Ok(50));
    }

    #[test]
    fn reports_missing_and_malformed_fields() {
        assert_eq!(
            bisection(json!({"function": "x", "xi": 0})),
            Err(ParamError::Missing("xu"))
        );
        assert_eq!(
            bisection(json!({"function": "x", "xi": "abc", "xu": 1})),
            Err(ParamError::WrongType {
                field: "xi",
                expected: "a number"
            })
        );
        assert_eq!(
            bisection(json!({"function": "   ", "xi": 0, "xu": 1})),
            Err(ParamError::Empty("function"))
        );
        assert_eq!(
            bisection(json!({"function": 42, "xi": 0, "xu": 1})),
            Err(ParamError::WrongType {
                field: "function",
                expected: "an expression string"
            })
        );
        assert_eq!(bisection(json!([1, 2])), Err(ParamError::NotAnObject));
    }

    #[test]
    fn rejects_non_finite_and_out_of_range_values() {
        assert_eq!(
            bisection(json!({"function": "x", "xi": "inf", "xu": 1})),
            Err(ParamError::NotFinite("xi"))
        );
        assert!(matches!(
            bisection(json!({"function": "x", "xi": 0, "xu": 1, "tolerance": 0})),
            Err(ParamError::OutOfRange {
                field: "tolerance",
                ..
            })
        ));
        for iters in [json!(0), json!(2.5), json!(-3), json!(10_001)] {
            assert!(matches!(
                bisection(json!({"function": "x", "xi": 0, "xu": 1, "max_iterations": iters})),
                Err(ParamError::OutOfRange {
                    field: "max_iterations",
                    ..
                })
            ));
        }
    }

    #[test]
    fn null_counts_as_absent() {
        let params = bisection(json!({"function": "x", "xi": 0, "xu": 1, "tolerance": null}))
            .expect("valid");
        assert_relative_eq!(params.number("tolerance").expect("defaulted"), 1e-6);
    }

    #[test]
    fn parses_matrices_and_optional_vectors() {
        let schema = Method::Jacobi.schema();
        let params = schema
            .validate(&json!({"A": [[4, 1], ["2", 3]], "b": [1, 2]}))
            .expect("valid");

        assert_eq!(
            params.matrix("A"),
            Ok(&[vec![4.0, 1.0], vec![2.0, 3.0]][..])
        );
        assert_eq!(params.vector("b"), Ok(&[1.0, 2.0][..]));
        assert_eq!(params.optional_vector("x0"), Ok(None));

        assert_eq!(
            schema.validate(&json!({"A": [], "b": [1]})),
            Err(ParamError::Empty("A"))
        );
        assert_eq!(
            schema.validate(&json!({"A": [[1, null]], "b": [1]})),
            Err(ParamError::WrongType {
                field: "A",
                expected: "a number"
            })
        );
    }

    #[test]
    fn variable_field_accepts_known_names_only() {
        let schema = crate::method::DERIVATIVE;
        let params = schema
            .validate(&json!({"function": "x*y", "variable": "y"}))
            .expect("valid");
        assert_eq!(params.variable("variable"), Some(Variable::Y));

        let params = schema.validate(&json!({"function": "x"})).expect("valid");
        assert_eq!(params.variable("variable"), None);

        assert!(matches!(
            schema.validate(&json!({"function": "x", "variable": "t"})),
            Err(ParamError::WrongType {
                field: "variable",
                ..
            })
        ));
    }

    #[test]
    fn schemas_serialize_for_discovery() {
        let value = serde_json::to_value(Method::Romberg.schema()).expect("serializable");
        assert_eq!(value["name"], json!("romberg"));
        assert_eq!(value["fields"][0]["name"], json!("function"));
        assert_eq!(value["fields"][0]["kind"], json!({"type": "expression"}));
        assert_eq!(value["fields"][4]["requirement"], json!({"default": 10.0}));
    }
}
