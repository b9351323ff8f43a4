use thiserror::Error;

/// Errors that can occur when compiling an expression.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("expression is empty")]
    Empty,

    #[error("expression is longer than {max} characters")]
    TooLong { max: usize },

    #[error("unexpected character '{ch}' at position {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    #[error("invalid number '{text}' at position {pos}")]
    InvalidNumber { text: String, pos: usize },

    #[error("unexpected {found} at position {pos}, expected {expected}")]
    Unexpected {
        found: String,
        expected: &'static str,
        pos: usize,
    },

    #[error("unexpected end of expression, expected {expected}")]
    UnexpectedEnd { expected: &'static str },

    #[error("unknown variable '{name}', allowed: {allowed}")]
    UnknownVariable { name: String, allowed: String },

    #[error("unknown function '{name}'")]
    UnknownFunction { name: String },

    #[error("expression nests deeper than {max} levels")]
    TooDeep { max: usize },

    #[error("derivative has {nodes} nodes, more than the limit of {max}")]
    DerivativeTooLarge { nodes: usize, max: usize },

    #[error("expression is not finite at the trial point {args:?}: {value}")]
    NonFiniteTrial { args: Vec<f64>, value: f64 },
}
