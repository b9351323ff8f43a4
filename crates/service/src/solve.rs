//! Running a method on validated parameters and rendering the result.
//!
//! Responses are plain JSON objects. Every response carries `method` and
//! `converged`; runs that did not converge also carry a `reason`. Traces are
//! rendered under `iterations_detail`.

use numeth_expr::{Expression, Variable, compile};
use numeth_solvers::{
    Config,
    equation::{
        self, bisection,
        bracket_search::{self, Outcome, Stage},
        fixed_point, newton, secant,
    },
    linear::{self, LinearSystem, gauss_seidel, jacobi},
    quadrature::{Quadrature, romberg, simpson, trapezoid},
    transient::euler,
};
use serde::Serialize;
use serde_json::{Map, Value, json};
use tracing::debug;

use crate::{Method, Params, ServiceError, method::DERIVATIVE};

type Object = Map<String, Value>;

/// Validates `body` against the method's schema and runs the method.
///
/// # Errors
///
/// Returns an error for invalid parameters or expressions, or when the
/// solver rejects its input before iterating.
pub fn solve(method: Method, body: &Value) -> Result<Value, ServiceError> {
    let params = method.schema().validate(body)?;

    let mut response = match method {
        Method::Bisection => run_bisection(&params)?,
        Method::Secant => run_secant(&params)?,
        Method::NewtonRaphson => run_newton(&params)?,
        Method::FixedPoint => run_fixed_point(&params)?,
        Method::Jacobi | Method::GaussSeidel => run_linear(method, &params)?,
        Method::Trapezoid | Method::Simpson => run_composite(method, &params)?,
        Method::Romberg => run_romberg(&params)?,
        Method::Euler => run_euler(&params)?,
    };

    let converged = response.get("converged").and_then(Value::as_bool);
    debug!(method = method.name(), ?converged, "method finished");

    let mut out = Object::new();
    out.insert("method".to_owned(), json!(method.name()));
    out.append(&mut response);
    Ok(Value::Object(out))
}

/// Differentiates an expression symbolically.
///
/// The body holds `function` and an optional `variable` (`x` by default).
///
/// # Errors
///
/// Returns an error for invalid parameters or an invalid expression.
pub fn derivative(body: &Value) -> Result<Value, ServiceError> {
    let params = DERIVATIVE.validate(body)?;
    let variable = params.variable("variable").unwrap_or(Variable::X);
    let f = expression(&params, "function", &[Variable::X, Variable::Y])?;
    let df = derivative_of(&f, variable)?;

    Ok(json!({
        "function": f.source(),
        "variable": variable.name(),
        "derivative": df.to_string(),
    }))
}

fn derivative_of(f: &Expression, variable: Variable) -> Result<Expression, ServiceError> {
    f.derivative(variable)
        .map_err(|source| ServiceError::Expression {
            field: "function",
            source,
        })
}

fn expression(
    params: &Params,
    field: &'static str,
    variables: &[Variable],
) -> Result<Expression, ServiceError> {
    compile(params.expression(field)?, variables)
        .map_err(|source| ServiceError::Expression { field, source })
}

fn single_variable(params: &Params) -> Result<Expression, ServiceError> {
    expression(params, "function", &[Variable::X])
}

fn config(params: &Params) -> Result<Config, ServiceError> {
    Ok(Config::new(
        params.integer("max_iterations")?,
        params.number("tolerance")?,
    )?)
}

fn to_value<T: Serialize>(value: &T) -> Result<Value, ServiceError> {
    Ok(serde_json::to_value(value)?)
}

fn insert_reason(out: &mut Object, reason: Option<String>) {
    if let Some(reason) = reason {
        out.insert("reason".to_owned(), json!(reason));
    }
}

fn root_response<R: Serialize>(
    f: &Expression,
    solution: &equation::Solution<R>,
) -> Result<Object, ServiceError> {
    let mut out = Object::new();
    out.insert("function".to_owned(), json!(f.source()));
    out.insert("converged".to_owned(), json!(solution.is_converged()));
    out.insert("status".to_owned(), to_value(&solution.status)?);
    let key = if solution.is_converged() {
        "root"
    } else {
        "last_estimate"
    };
    out.insert(key.to_owned(), json!(solution.x));
    out.insert("iterations".to_owned(), json!(solution.iters));
    out.insert("final_error".to_owned(), json!(solution.error));
    out.insert("residual".to_owned(), json!(solution.residual));
    insert_reason(&mut out, solution.status.reason());
    out.insert(
        "iterations_detail".to_owned(),
        to_value(&solution.trace)?,
    );
    Ok(out)
}

fn run_bisection(params: &Params) -> Result<Object, ServiceError> {
    let f = single_variable(params)?;
    let (xi, xu) = (params.number("xi")?, params.number("xu")?);
    let config = config(params)?;

    match bracket_search::find_bracket(&f, xi, xu, config.tolerance()) {
        Outcome::Found(found) => {
            let solution = bisection::solve_unobserved(&f, found.bracket, &config)?;
            let mut out = root_response(&f, &solution)?;
            out.insert(
                "bracket".to_owned(),
                json!({
                    "interval": found.bracket,
                    "requested": [xi, xu],
                    "stage": found.stage.name(),
                    "adjusted": found.stage != Stage::Endpoint,
                    "others_possible": found.others_possible,
                }),
            );
            Ok(out)
        }
        Outcome::ExactRoot { x, stage } => Ok(json_object(json!({
            "function": f.source(),
            "converged": true,
            "status": "converged",
            "root": x,
            "iterations": 0,
            "final_error": 0.0,
            "residual": f.eval(&[x]),
            "bracket": {
                "requested": [xi, xu],
                "stage": stage.name(),
                "exact_root": true,
            },
            "iterations_detail": [],
        }))),
        Outcome::NotFound { reason } => Ok(json_object(json!({
            "function": f.source(),
            "converged": false,
            "status": "no_bracket",
            "reason": reason,
            "iterations": 0,
            "iterations_detail": [],
        }))),
    }
}

fn run_secant(params: &Params) -> Result<Object, ServiceError> {
    let f = single_variable(params)?;
    let config = config(params)?;
    let solution =
        secant::solve_unobserved(&f, params.number("x0")?, params.number("x1")?, &config)?;
    root_response(&f, &solution)
}

fn run_newton(params: &Params) -> Result<Object, ServiceError> {
    let f = single_variable(params)?;
    let df = derivative_of(&f, Variable::X)?;
    let config = config(params)?;
    let solution = newton::solve_unobserved(&f, &df, params.number("x0")?, &config)?;

    let mut out = root_response(&f, &solution)?;
    out.insert("derivative".to_owned(), json!(df.to_string()));
    Ok(out)
}

fn run_fixed_point(params: &Params) -> Result<Object, ServiceError> {
    let g = single_variable(params)?;
    let config = config(params)?;
    let solution = fixed_point::solve_unobserved(&g, params.number("x0")?, &config)?;
    root_response(&g, &solution)
}

fn run_linear(method: Method, params: &Params) -> Result<Object, ServiceError> {
    let system = LinearSystem::new(params.matrix("A")?.to_vec(), params.vector("b")?.to_vec())
        .map_err(linear::Error::from)?;
    let x0 = params.optional_vector("x0")?;
    let config = config(params)?;

    let solution = if method == Method::Jacobi {
        jacobi::solve_unobserved(&system, x0, &config)?
    } else {
        gauss_seidel::solve_unobserved(&system, x0, &config)?
    };

    let mut out = Object::new();
    out.insert("converged".to_owned(), json!(solution.is_converged()));
    out.insert("status".to_owned(), to_value(&solution.status)?);
    out.insert("solution".to_owned(), json!(solution.x));
    out.insert("iterations".to_owned(), json!(solution.iters));
    out.insert("final_error".to_owned(), json!(solution.error));
    out.insert(
        "residual_norm".to_owned(),
        json!(system.residual_norm(&solution.x)),
    );
    out.insert(
        "diagonally_dominant".to_owned(),
        json!(solution.diagonally_dominant),
    );
    if !solution.diagonally_dominant {
        out.insert(
            "warning".to_owned(),
            json!("matrix is not diagonally dominant; convergence is not guaranteed"),
        );
    }
    insert_reason(&mut out, solution.status.reason());
    out.insert(
        "iterations_detail".to_owned(),
        to_value(&solution.trace)?,
    );
    Ok(out)
}

fn run_composite(method: Method, params: &Params) -> Result<Object, ServiceError> {
    let f = single_variable(params)?;
    let (a, b, n) = (
        params.number("a")?,
        params.number("b")?,
        params.integer("n")?,
    );

    let Quadrature {
        integral,
        step,
        panels,
        samples,
    } = if method == Method::Trapezoid {
        trapezoid::integrate(&f, a, b, n)?
    } else {
        simpson::integrate(&f, a, b, n)?
    };

    Ok(json_object(json!({
        "function": f.source(),
        "converged": true,
        "a": a,
        "b": b,
        "n": panels,
        "h": step,
        "integral": integral,
        "iterations_detail": to_value(&samples)?,
    })))
}

fn run_romberg(params: &Params) -> Result<Object, ServiceError> {
    let f = single_variable(params)?;
    let (a, b) = (params.number("a")?, params.number("b")?);
    let config = config(params)?;
    let solution = romberg::integrate_unobserved(&f, a, b, &config)?;

    let table: Vec<&[f64]> = solution
        .table
        .iter()
        .map(|row| row.estimates.as_slice())
        .collect();

    let mut out = Object::new();
    out.insert("function".to_owned(), json!(f.source()));
    out.insert("converged".to_owned(), json!(solution.is_converged()));
    out.insert("status".to_owned(), to_value(&solution.status)?);
    out.insert("integral".to_owned(), json!(solution.integral));
    out.insert("iterations".to_owned(), json!(solution.iters));
    out.insert("final_error".to_owned(), json!(solution.error));
    out.insert("table".to_owned(), json!(table));
    insert_reason(&mut out, solution.status.reason());
    out.insert(
        "iterations_detail".to_owned(),
        to_value(&solution.table)?,
    );
    Ok(out)
}

fn run_euler(params: &Params) -> Result<Object, ServiceError> {
    let f = expression(params, "function", &[Variable::X, Variable::Y])?;
    let (x0, y0, h, x_final) = (
        params.number("x0")?,
        params.number("y0")?,
        params.number("h")?,
        params.number("x_final")?,
    );
    let solution = euler::solve_unobserved(&f, x0, y0, h, x_final)?;

    let mut out = Object::new();
    out.insert("function".to_owned(), json!(f.source()));
    out.insert("converged".to_owned(), json!(solution.is_complete()));
    out.insert("status".to_owned(), to_value(&solution.status)?);
    out.insert("x".to_owned(), json!(solution.x));
    out.insert("y".to_owned(), json!(solution.y));
    out.insert("steps".to_owned(), json!(solution.steps));
    insert_reason(&mut out, solution.status.reason());
    out.insert(
        "iterations_detail".to_owned(),
        to_value(&solution.trace)?,
    );
    Ok(out)
}

fn json_object(value: Value) -> Object {
    match value {
        Value::Object(map) => map,
        _ => Object::new(),
    }
}
