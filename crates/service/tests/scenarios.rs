use approx::assert_relative_eq;
use numeth_service::{Method, ServiceError, solve};
use serde_json::{Value, json};

fn number(value: &Value, key: &str) -> f64 {
    value[key]
        .as_f64()
        .unwrap_or_else(|| panic!("{key} missing in {value}"))
}

#[test]
fn bisection_on_shifted_square() {
    let out = solve(
        Method::Bisection,
        &json!({"function": "x^2 - 4", "xi": 0, "xu": 3, "tolerance": 1e-6}),
    )
    .expect("should solve");

    assert_eq!(out["method"], json!("bisection"));
    assert_eq!(out["converged"], json!(true));
    assert_relative_eq!(number(&out, "root"), 2.0, epsilon = 1e-6);
    assert_eq!(out["bracket"]["stage"], json!("endpoint"));
    assert_eq!(out["bracket"]["adjusted"], json!(false));

    let detail = out["iterations_detail"].as_array().expect("trace");
    assert_eq!(detail.len() as u64, out["iterations"].as_u64().expect("count"));
    assert_eq!(detail[0]["xi"], json!(0.0));
    assert_eq!(detail[0]["xu"], json!(3.0));
    assert_eq!(detail[0]["xr"], json!(1.5));
}

#[test]
fn newton_raphson_on_square_root_of_two() {
    let out = solve(
        Method::NewtonRaphson,
        &json!({"function": "x^2 - 2", "x0": 1.0, "tolerance": 1e-6}),
    )
    .expect("should solve");

    assert_eq!(out["converged"], json!(true));
    assert_relative_eq!(number(&out, "root"), 1.414_213_56, epsilon = 1e-8);
    assert_eq!(out["derivative"], json!("2*x"));
}

#[test]
fn jacobi_on_two_by_two_system() {
    let out = solve(
        Method::Jacobi,
        &json!({"A": [[4, 1], [2, 3]], "b": [1, 2], "tolerance": 1e-6}),
    )
    .expect("should solve");

    // Direct solve: det = 10, x = (3 - 2) / 10, y = (8 - 2) / 10.
    assert_eq!(out["converged"], json!(true));
    let x = out["solution"].as_array().expect("solution");
    assert_relative_eq!(x[0].as_f64().expect("number"), 0.1, epsilon = 1e-5);
    assert_relative_eq!(x[1].as_f64().expect("number"), 0.6, epsilon = 1e-5);
    assert!(number(&out, "residual_norm") < 1e-5);
    assert_eq!(out["diagonally_dominant"], json!(true));
}

#[test]
fn trapezoid_on_square_with_two_panels() {
    let out = solve(
        Method::Trapezoid,
        &json!({"function": "x^2", "a": 0, "b": 1, "n": 2}),
    )
    .expect("should integrate");

    assert_relative_eq!(number(&out, "integral"), 0.375);
    assert_relative_eq!(number(&out, "h"), 0.5);
}

#[test]
fn secant_with_identical_seeds_is_an_input_error() {
    let err = solve(
        Method::Secant,
        &json!({"function": "x^2 - 2", "x0": 1.0, "x1": 1.0}),
    )
    .unwrap_err();

    assert!(matches!(err, ServiceError::Equation(_)));
    assert_eq!(err.kind(), "invalid_input");
}

#[test]
fn gauss_seidel_and_jacobi_agree() {
    let body = json!({
        "A": [[10, -1, 2], [-1, 11, -1], [2, -1, 10]],
        "b": [6, 25, -11],
        "tolerance": 1e-10,
        "max_iterations": 500,
    });
    let jacobi = solve(Method::Jacobi, &body).expect("should solve");
    let gauss_seidel = solve(Method::GaussSeidel, &body).expect("should solve");

    let iterations = |out: &Value| out["iterations"].as_u64().expect("count");
    assert!(iterations(&gauss_seidel) <= iterations(&jacobi));

    let xs = |out: &Value| -> Vec<f64> {
        out["solution"]
            .as_array()
            .expect("solution")
            .iter()
            .filter_map(Value::as_f64)
            .collect()
    };
    for (a, b) in xs(&jacobi).iter().zip(xs(&gauss_seidel)) {
        assert_relative_eq!(*a, b, epsilon = 1e-8);
    }
}

#[test]
fn simpson_rejects_odd_panel_counts() {
    let body = |n: u32| json!({"function": "sin(x)", "a": 0, "b": std::f64::consts::PI, "n": n});
    assert_eq!(
        solve(Method::Simpson, &body(3)).unwrap_err().kind(),
        "invalid_input"
    );
    let out = solve(Method::Simpson, &body(4)).expect("should integrate");
    assert_relative_eq!(number(&out, "integral"), 2.0, epsilon = 1e-2);
}

#[test]
fn identical_requests_give_identical_responses() {
    let body = json!({"function": "x^3 - x - 2", "x0": 1, "x1": 2, "tolerance": 1e-10});
    let first = solve(Method::Secant, &body).expect("should solve");
    let second = solve(Method::Secant, &body).expect("should solve");
    assert_eq!(first, second);
}

#[test]
fn unsafe_text_never_reaches_a_solver() {
    for function in ["__import__('os').system('ls')", "open('x')", "eval(x)", "x; y"] {
        let err = solve(
            Method::FixedPoint,
            &json!({"function": function, "x0": 1}),
        )
        .unwrap_err();
        assert_eq!(err.kind(), "invalid_expression", "{function}");
    }
}
