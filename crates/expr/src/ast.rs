use std::fmt;

/// A variable an expression may reference.
///
/// Single-variable methods allow only `x`; the ODE method allows `x` and `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variable {
    X,
    Y,
}

impl Variable {
    /// Returns the argument slot this variable reads from.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
        }
    }

    /// Returns the variable's name as written in expressions.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
        }
    }

    /// Looks up a variable by name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "x" => Some(Self::X),
            "y" => Some(Self::Y),
            _ => None,
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A named mathematical constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constant {
    Pi,
    E,
}

impl Constant {
    /// Returns the numeric value of the constant.
    #[must_use]
    pub fn value(self) -> f64 {
        match self {
            Self::Pi => std::f64::consts::PI,
            Self::E => std::f64::consts::E,
        }
    }

    pub(crate) fn from_name(name: &str) -> Option<Self> {
        match name {
            "pi" => Some(Self::Pi),
            "e" => Some(Self::E),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Pi => "pi",
            Self::E => "e",
        }
    }
}

/// A function from the allow-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Func {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Exp,
    /// Natural logarithm, spelled `ln` or `log`.
    Ln,
    Log10,
    Sqrt,
    Abs,
}

impl Func {
    pub(crate) fn from_name(name: &str) -> Option<Self> {
        let func = match name {
            "sin" => Self::Sin,
            "cos" => Self::Cos,
            "tan" => Self::Tan,
            "asin" => Self::Asin,
            "acos" => Self::Acos,
            "atan" => Self::Atan,
            "sinh" => Self::Sinh,
            "cosh" => Self::Cosh,
            "tanh" => Self::Tanh,
            "exp" => Self::Exp,
            "ln" | "log" => Self::Ln,
            "log10" => Self::Log10,
            "sqrt" => Self::Sqrt,
            "abs" => Self::Abs,
            _ => return None,
        };
        Some(func)
    }

    /// Returns the canonical name used when rendering.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Asin => "asin",
            Self::Acos => "acos",
            Self::Atan => "atan",
            Self::Sinh => "sinh",
            Self::Cosh => "cosh",
            Self::Tanh => "tanh",
            Self::Exp => "exp",
            Self::Ln => "ln",
            Self::Log10 => "log10",
            Self::Sqrt => "sqrt",
            Self::Abs => "abs",
        }
    }

    /// Applies the function to a value.
    #[must_use]
    pub fn apply(self, v: f64) -> f64 {
        match self {
            Self::Sin => v.sin(),
            Self::Cos => v.cos(),
            Self::Tan => v.tan(),
            Self::Asin => v.asin(),
            Self::Acos => v.acos(),
            Self::Atan => v.atan(),
            Self::Sinh => v.sinh(),
            Self::Cosh => v.cosh(),
            Self::Tanh => v.tanh(),
            Self::Exp => v.exp(),
            Self::Ln => v.ln(),
            Self::Log10 => v.log10(),
            Self::Sqrt => v.sqrt(),
            Self::Abs => v.abs(),
        }
    }
}

/// A binary arithmetic operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinaryOp {
    /// Applies the operator to two values.
    #[must_use]
    pub fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            Self::Add => lhs + rhs,
            Self::Sub => lhs - rhs,
            Self::Mul => lhs * rhs,
            Self::Div => lhs / rhs,
            Self::Pow => lhs.powf(rhs),
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            Self::Add => " + ",
            Self::Sub => " - ",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Pow => "^",
        }
    }

    fn precedence(self) -> u8 {
        match self {
            Self::Add | Self::Sub => 1,
            Self::Mul | Self::Div => 2,
            Self::Pow => 4,
        }
    }
}

/// An expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Num(f64),
    Var(Variable),
    Const(Constant),
    Neg(Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    Call(Func, Box<Expr>),
}

impl Expr {
    pub(crate) fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        Self::Binary(op, Box::new(lhs), Box::new(rhs))
    }

    pub(crate) fn call(func: Func, arg: Expr) -> Self {
        Self::Call(func, Box::new(arg))
    }

    pub(crate) fn neg(expr: Expr) -> Self {
        Self::Neg(Box::new(expr))
    }

    /// Evaluates the expression.
    ///
    /// `args` is indexed by [`Variable::index`]. A variable with no
    /// corresponding argument evaluates to NaN rather than panicking.
    #[must_use]
    pub fn eval(&self, args: &[f64]) -> f64 {
        match self {
            Self::Num(v) => *v,
            Self::Var(var) => args.get(var.index()).copied().unwrap_or(f64::NAN),
            Self::Const(c) => c.value(),
            Self::Neg(e) => -e.eval(args),
            Self::Binary(op, lhs, rhs) => op.apply(lhs.eval(args), rhs.eval(args)),
            Self::Call(func, arg) => func.apply(arg.eval(args)),
        }
    }

    /// Returns true if `var` appears anywhere in the expression.
    #[must_use]
    pub fn contains(&self, var: Variable) -> bool {
        match self {
            Self::Num(_) | Self::Const(_) => false,
            Self::Var(v) => *v == var,
            Self::Neg(e) | Self::Call(_, e) => e.contains(var),
            Self::Binary(_, lhs, rhs) => lhs.contains(var) || rhs.contains(var),
        }
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub fn size(&self) -> usize {
        match self {
            Self::Num(_) | Self::Const(_) | Self::Var(_) => 1,
            Self::Neg(e) | Self::Call(_, e) => 1 + e.size(),
            Self::Binary(_, lhs, rhs) => 1 + lhs.size() + rhs.size(),
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            Self::Binary(op, _, _) => op.precedence(),
            Self::Neg(_) => 3,
            Self::Num(v) if v.is_sign_negative() => 3,
            _ => 5,
        }
    }

    fn fmt_child(&self, f: &mut fmt::Formatter<'_>, min_precedence: u8) -> fmt::Result {
        if self.precedence() < min_precedence {
            write!(f, "({self})")
        } else {
            write!(f, "{self}")
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Num(v) => write!(f, "{v}"),
            Self::Var(var) => write!(f, "{var}"),
            Self::Const(c) => f.write_str(c.name()),
            Self::Neg(e) => {
                f.write_str("-")?;
                e.fmt_child(f, 4)
            }
            Self::Binary(op, lhs, rhs) => {
                let p = op.precedence();
                let (left_min, right_min) = match op {
                    BinaryOp::Add | BinaryOp::Mul => (p, p),
                    BinaryOp::Sub | BinaryOp::Div => (p, p + 1),
                    BinaryOp::Pow => (p + 1, p),
                };
                lhs.fmt_child(f, left_min)?;
                f.write_str(op.symbol())?;
                rhs.fmt_child(f, right_min)
            }
            Self::Call(func, arg) => write!(f, "{}({arg})", func.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn x() -> Expr {
        Expr::Var(Variable::X)
    }

    #[test]
    fn evaluates_nested_expression() {
        // sin(x)^2 + cos(x)^2
        let expr = Expr::binary(
            BinaryOp::Add,
            Expr::binary(BinaryOp::Pow, Expr::call(Func::Sin, x()), Expr::Num(2.0)),
            Expr::binary(BinaryOp::Pow, Expr::call(Func::Cos, x()), Expr::Num(2.0)),
        );
        assert_relative_eq!(expr.eval(&[0.7]), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn missing_argument_is_nan() {
        let expr = Expr::Var(Variable::Y);
        assert!(expr.eval(&[1.0]).is_nan());
    }

    #[test]
    fn renders_with_minimal_parentheses() {
        let sum = Expr::binary(BinaryOp::Add, x(), Expr::Num(1.0));
        let product = Expr::binary(BinaryOp::Mul, Expr::Num(2.0), sum.clone());
        assert_eq!(product.to_string(), "2*(x + 1)");

        let difference = Expr::binary(BinaryOp::Sub, x(), sum);
        assert_eq!(difference.to_string(), "x - (x + 1)");

        let power = Expr::binary(BinaryOp::Pow, Expr::neg(x()), Expr::Num(-1.0));
        assert_eq!(power.to_string(), "(-x)^(-1)");

        let nested = Expr::binary(
            BinaryOp::Pow,
            x(),
            Expr::binary(BinaryOp::Pow, Expr::Num(2.0), Expr::Num(3.0)),
        );
        assert_eq!(nested.to_string(), "x^2^3");
    }

    #[test]
    fn contains_finds_variables() {
        let expr = Expr::call(Func::Exp, Expr::binary(BinaryOp::Mul, x(), Expr::Const(Constant::Pi)));
        assert!(expr.contains(Variable::X));
        assert!(!expr.contains(Variable::Y));
        assert_eq!(expr.size(), 4);
    }
}
