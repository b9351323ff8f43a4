//! Expression compilation for the numeth solvers.
//!
//! Expressions are parsed with a closed grammar: numbers, the permitted
//! variables, `+ - * / ^` (`**` is accepted as `^`), parentheses, the
//! constants `pi` and `e`, and a fixed set of single-argument functions.
//! Anything else is a [`ParseError`], so no text can reach beyond plain
//! arithmetic.
//!
//! ```
//! use numeth_expr::{Variable, compile};
//!
//! let f = compile("x^2 - 2", &[Variable::X]).unwrap();
//! assert_eq!(f.eval(&[3.0]), 7.0);
//! assert_eq!(f.derivative(Variable::X).unwrap().to_string(), "2*x");
//! ```

mod ast;
mod derivative;
mod error;
mod expression;
mod parse;
mod simplify;
mod token;

pub use ast::{BinaryOp, Constant, Expr, Func, Variable};
pub use error::ParseError;
pub use expression::{Expression, compile};
