use crate::{BinaryOp, Expr, Func, Variable, simplify::simplify};

/// Differentiates `expr` with respect to `var` and simplifies the result.
pub(crate) fn derivative(expr: &Expr, var: Variable) -> Expr {
    simplify(diff(expr, var))
}

fn num(v: f64) -> Expr {
    Expr::Num(v)
}

fn add(a: Expr, b: Expr) -> Expr {
    Expr::binary(BinaryOp::Add, a, b)
}

fn sub(a: Expr, b: Expr) -> Expr {
    Expr::binary(BinaryOp::Sub, a, b)
}

fn mul(a: Expr, b: Expr) -> Expr {
    Expr::binary(BinaryOp::Mul, a, b)
}

fn div(a: Expr, b: Expr) -> Expr {
    Expr::binary(BinaryOp::Div, a, b)
}

fn pow(a: Expr, b: Expr) -> Expr {
    Expr::binary(BinaryOp::Pow, a, b)
}

fn diff(expr: &Expr, var: Variable) -> Expr {
    match expr {
        Expr::Num(_) | Expr::Const(_) => num(0.0),
        Expr::Var(v) => num(if *v == var { 1.0 } else { 0.0 }),
        Expr::Neg(u) => Expr::neg(diff(u, var)),
        Expr::Binary(op, u, v) => {
            let (u, v) = (u.as_ref(), v.as_ref());
            match op {
                BinaryOp::Add => add(diff(u, var), diff(v, var)),
                BinaryOp::Sub => sub(diff(u, var), diff(v, var)),
                // (uv)' = u'v + uv'
                BinaryOp::Mul => add(
                    mul(diff(u, var), v.clone()),
                    mul(u.clone(), diff(v, var)),
                ),
                // (u/v)' = (u'v - uv') / v^2
                BinaryOp::Div => div(
                    sub(
                        mul(diff(u, var), v.clone()),
                        mul(u.clone(), diff(v, var)),
                    ),
                    pow(v.clone(), num(2.0)),
                ),
                BinaryOp::Pow => diff_pow(u, v, var),
            }
        }
        Expr::Call(func, u) => mul(diff_call(*func, u), diff(u, var)),
    }
}

fn diff_pow(u: &Expr, v: &Expr, var: Variable) -> Expr {
    let base_varies = u.contains(var);
    let exponent_varies = v.contains(var);

    match (base_varies, exponent_varies) {
        (false, false) => num(0.0),
        // (u^c)' = c u^(c-1) u'
        (true, false) => mul(
            mul(v.clone(), pow(u.clone(), sub(v.clone(), num(1.0)))),
            diff(u, var),
        ),
        // (c^v)' = c^v ln(c) v'
        (false, true) => mul(
            mul(pow(u.clone(), v.clone()), Expr::call(Func::Ln, u.clone())),
            diff(v, var),
        ),
        // (u^v)' = u^v (v' ln(u) + v u'/u)
        (true, true) => mul(
            pow(u.clone(), v.clone()),
            add(
                mul(diff(v, var), Expr::call(Func::Ln, u.clone())),
                div(mul(v.clone(), diff(u, var)), u.clone()),
            ),
        ),
    }
}

/// Returns the outer derivative f'(u) for the chain rule.
fn diff_call(func: Func, u: &Expr) -> Expr {
    let u = u.clone();
    match func {
        Func::Sin => Expr::call(Func::Cos, u),
        Func::Cos => Expr::neg(Expr::call(Func::Sin, u)),
        Func::Tan => div(num(1.0), pow(Expr::call(Func::Cos, u), num(2.0))),
        Func::Asin => div(
            num(1.0),
            Expr::call(Func::Sqrt, sub(num(1.0), pow(u, num(2.0)))),
        ),
        Func::Acos => Expr::neg(div(
            num(1.0),
            Expr::call(Func::Sqrt, sub(num(1.0), pow(u, num(2.0)))),
        )),
        Func::Atan => div(num(1.0), add(num(1.0), pow(u, num(2.0)))),
        Func::Sinh => Expr::call(Func::Cosh, u),
        Func::Cosh => Expr::call(Func::Sinh, u),
        Func::Tanh => sub(num(1.0), pow(Expr::call(Func::Tanh, u), num(2.0))),
        Func::Exp => Expr::call(Func::Exp, u),
        Func::Ln => div(num(1.0), u),
        Func::Log10 => div(num(1.0), mul(u, Expr::call(Func::Ln, num(10.0)))),
        Func::Sqrt => div(num(1.0), mul(num(2.0), Expr::call(Func::Sqrt, u))),
        Func::Abs => div(u.clone(), Expr::call(Func::Abs, u)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::parse::parse;

    const X: &[Variable] = &[Variable::X];

    fn d(src: &str) -> Expr {
        derivative(&parse(src, X).expect("valid"), Variable::X)
    }

    /// Central difference used to cross-check symbolic results.
    fn numeric(src: &str, x: f64) -> f64 {
        let expr = parse(src, X).expect("valid");
        let h = 1e-6;
        (expr.eval(&[x + h]) - expr.eval(&[x - h])) / (2.0 * h)
    }

    #[test]
    fn renders_polynomial_derivatives() {
        assert_eq!(d("x^2 - 2").to_string(), "2*x");
        assert_eq!(d("x^3").to_string(), "3*x^2");
        assert_eq!(d("5*x + 7").to_string(), "5");
        assert_eq!(d("x").to_string(), "1");
        assert_eq!(d("pi").to_string(), "0");
    }

    #[test]
    fn applies_chain_rule() {
        assert_eq!(d("sin(2*x)").to_string(), "2*cos(2*x)");
        assert_eq!(d("exp(x)").to_string(), "exp(x)");
    }

    #[test]
    fn matches_central_differences() {
        let cases = [
            "x^2*sin(x)",
            "exp(-x^2)/(1 + x)",
            "ln(x^2 + 1) - sqrt(x)",
            "x^x",
            "2^x",
            "tan(x) + atan(x) + tanh(x)",
            "asin(x/2) + acos(x/3)",
            "log10(x) + abs(x - 3)",
            "cosh(x) - sinh(x)",
            "-cos(x)",
        ];
        for src in cases {
            for x in [0.3, 0.7, 1.3] {
                let symbolic = d(src).eval(&[x]);
                assert_relative_eq!(symbolic, numeric(src, x), epsilon = 1e-6, max_relative = 1e-6);
            }
        }
    }

    #[test]
    fn ignores_other_variables() {
        let expr = parse("x*y + y^2", &[Variable::X, Variable::Y]).expect("valid");
        assert_eq!(derivative(&expr, Variable::X).to_string(), "y");
        assert_eq!(derivative(&expr, Variable::Y).to_string(), "x + 2*y");
    }
}
