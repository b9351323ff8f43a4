use crate::{BinaryOp, Expr};

/// Applies constant folding and the `0`/`1` identities bottom-up.
///
/// Tidies the output of differentiation. It does not canonicalise.
pub(crate) fn simplify(expr: Expr) -> Expr {
    match expr {
        Expr::Neg(inner) => match simplify(*inner) {
            Expr::Num(v) => Expr::Num(-v),
            Expr::Neg(e) => *e,
            e => Expr::neg(e),
        },
        Expr::Call(func, arg) => {
            let arg = simplify(*arg);
            if let Expr::Num(v) = arg {
                let value = func.apply(v);
                if value.is_finite() && value.fract() == 0.0 {
                    return Expr::Num(value);
                }
            }
            Expr::call(func, arg)
        }
        Expr::Binary(op, lhs, rhs) => binary(op, simplify(*lhs), simplify(*rhs)),
        leaf => leaf,
    }
}

#[allow(clippy::float_cmp)]
fn is(expr: &Expr, value: f64) -> bool {
    matches!(expr, Expr::Num(v) if *v == value)
}

fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    if let (Expr::Num(a), Expr::Num(b)) = (&lhs, &rhs) {
        let value = op.apply(*a, *b);
        if value.is_finite() {
            return Expr::Num(value);
        }
    }

    match op {
        BinaryOp::Add if is(&lhs, 0.0) => rhs,
        BinaryOp::Add | BinaryOp::Sub if is(&rhs, 0.0) => lhs,
        BinaryOp::Sub if is(&lhs, 0.0) => simplify(Expr::neg(rhs)),
        BinaryOp::Sub if lhs == rhs => Expr::Num(0.0),
        BinaryOp::Mul if is(&lhs, 0.0) || is(&rhs, 0.0) => Expr::Num(0.0),
        BinaryOp::Mul if is(&lhs, 1.0) => rhs,
        BinaryOp::Mul | BinaryOp::Div if is(&rhs, 1.0) => lhs,
        BinaryOp::Mul if is(&lhs, -1.0) => simplify(Expr::neg(rhs)),
        BinaryOp::Mul if is(&rhs, -1.0) => simplify(Expr::neg(lhs)),
        BinaryOp::Div if is(&lhs, 0.0) => Expr::Num(0.0),
        BinaryOp::Pow if is(&rhs, 0.0) => Expr::Num(1.0),
        BinaryOp::Pow if is(&rhs, 1.0) || is(&lhs, 1.0) => lhs,
        _ => fold_coefficients(op, lhs, rhs),
    }
}

/// Folds `a*(b*u)` into `(a*b)*u` so chains of numeric factors collapse.
fn fold_coefficients(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    if op == BinaryOp::Mul {
        if let (Expr::Num(a), Expr::Binary(BinaryOp::Mul, inner_lhs, inner_rhs)) = (&lhs, &rhs) {
            if let Expr::Num(b) = **inner_lhs {
                return binary(BinaryOp::Mul, Expr::Num(a * b), (**inner_rhs).clone());
            }
        }
        // Keep numeric factors on the left.
        if matches!(rhs, Expr::Num(_)) && !matches!(lhs, Expr::Num(_)) {
            return binary(BinaryOp::Mul, rhs, lhs);
        }
    }
    Expr::binary(op, lhs, rhs)
}
