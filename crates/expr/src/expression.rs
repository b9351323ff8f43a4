use std::fmt;

use numeth_core::Function;
use tracing::debug;

use crate::{Expr, ParseError, Variable, derivative::derivative, parse::parse};

/// Maximum accepted source length, in bytes.
const MAX_LEN: usize = 4096;

/// Maximum number of tree nodes in a simplified derivative.
const MAX_DERIVATIVE_NODES: usize = 10_000;

/// A compiled expression over a fixed set of variables.
///
/// Created by [`compile`]. Evaluation is a walk over the parsed tree; no
/// global state is involved, so each request owns its own expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    source: String,
    expr: Expr,
    variables: Vec<Variable>,
}

/// Compiles `text` into an [`Expression`] that may reference `variables`.
///
/// After parsing, the expression is evaluated once with every variable set
/// to `1.0` to confirm it yields a finite number.
///
/// # Errors
///
/// Returns a [`ParseError`] if the text is empty or too long, falls outside
/// the grammar, references a variable not in `variables`, or evaluates to a
/// non-finite value at the trial point.
pub fn compile(text: &str, variables: &[Variable]) -> Result<Expression, ParseError> {
    let source = text.trim();
    if source.is_empty() {
        return Err(ParseError::Empty);
    }
    if source.len() > MAX_LEN {
        return Err(ParseError::TooLong { max: MAX_LEN });
    }

    let expr = parse(source, variables)?;

    let trial = [1.0; 2];
    let value = expr.eval(&trial);
    if !value.is_finite() {
        return Err(ParseError::NonFiniteTrial {
            args: trial[..variables.len().min(2)].to_vec(),
            value,
        });
    }

    debug!(source, parsed = %expr, "compiled expression");

    Ok(Expression {
        source: source.to_owned(),
        expr,
        variables: variables.to_vec(),
    })
}

impl Expression {
    /// Returns the (trimmed) source text.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the parsed expression tree.
    #[must_use]
    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Returns the variables this expression may reference.
    #[must_use]
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Evaluates the expression; `args` is indexed by [`Variable::index`].
    #[must_use]
    pub fn eval(&self, args: &[f64]) -> f64 {
        self.expr.eval(args)
    }

    /// Returns the symbolic derivative with respect to `var`.
    ///
    /// The result is simplified, and its source is the rendered form.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::DerivativeTooLarge`] if the simplified derivative
    /// has more than 10,000 nodes. Long products grow quadratically.
    pub fn derivative(&self, var: Variable) -> Result<Expression, ParseError> {
        let expr = derivative(&self.expr, var);
        let nodes = expr.size();
        if nodes > MAX_DERIVATIVE_NODES {
            return Err(ParseError::DerivativeTooLarge {
                nodes,
                max: MAX_DERIVATIVE_NODES,
            });
        }
        Ok(Expression {
            source: expr.to_string(),
            expr,
            variables: self.variables.clone(),
        })
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expr)
    }
}

impl Function<1> for Expression {
    fn call(&self, args: &[f64; 1]) -> f64 {
        self.expr.eval(args)
    }
}

impl Function<2> for Expression {
    fn call(&self, args: &[f64; 2]) -> f64 {
        self.expr.eval(args)
    }
}
