//! HTTP routes.
//!
//! - `POST /solve/{method}` runs a method on a JSON body
//! - `POST /derivative` differentiates an expression
//! - `GET /methods` lists every method with its parameter schema
//! - `GET /health` reports liveness
//!
//! Input errors are answered with `400` (`404` for an unknown method) and a
//! body of the form `{"error": "...", "kind": "..."}`.

use std::convert::Infallible;

use serde_json::{Value, json};
use tracing::{info, warn};
use warp::{
    Filter, Rejection, Reply,
    http::StatusCode,
    reply::{Json, WithStatus},
};

use crate::{Method, ServerConfig, ServiceError, derivative, solve};

/// Builds the full route tree with permissive CORS.
///
/// Request bodies larger than `body_limit` bytes are rejected.
pub fn routes(body_limit: u64) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let json_body = warp::body::content_length_limit(body_limit).and(warp::body::json());

    let solve_route = warp::path!("solve" / String)
        .and(warp::post())
        .and(json_body.clone())
        .and_then(handle_solve);

    let derivative_route = warp::path!("derivative")
        .and(warp::post())
        .and(json_body)
        .and_then(handle_derivative);

    let methods = warp::path!("methods").and(warp::get()).map(|| {
        let schemas: Vec<_> = Method::ALL.into_iter().map(Method::schema).collect();
        warp::reply::json(&schemas)
    });

    let health = warp::path!("health")
        .and(warp::get())
        .map(|| warp::reply::json(&json!({"status": "ok"})));

    let cors = warp::cors()
        .allow_any_origin()
        .allow_methods(["GET", "POST", "OPTIONS"])
        .allow_headers(["content-type"]);

    solve_route
        .or(derivative_route)
        .or(methods)
        .or(health)
        .with(cors)
        .with(warp::trace::request())
}

/// Serves [`routes`] on the configured address until the process exits.
pub async fn serve(config: ServerConfig) {
    let addr = config.addr();
    info!(%addr, "numeth server listening");
    warp::serve(routes(config.body_limit)).run(addr).await;
}

async fn handle_solve(name: String, body: Value) -> Result<WithStatus<Json>, Infallible> {
    let method = match name.parse::<Method>() {
        Ok(method) => method,
        Err(err) => return Ok(error_reply(&ServiceError::from(err))),
    };
    Ok(run_blocking(move || solve(method, &body)).await)
}

async fn handle_derivative(body: Value) -> Result<WithStatus<Json>, Infallible> {
    Ok(run_blocking(move || derivative(&body)).await)
}

/// Runs a solver off the async executor and turns its result into a reply.
async fn run_blocking<F>(job: F) -> WithStatus<Json>
where
    F: FnOnce() -> Result<Value, ServiceError> + Send + 'static,
{
    match tokio::task::spawn_blocking(job).await {
        Ok(Ok(value)) => warp::reply::with_status(warp::reply::json(&value), StatusCode::OK),
        Ok(Err(err)) => error_reply(&err),
        Err(err) => {
            warn!(%err, "solver task failed");
            warp::reply::with_status(
                warp::reply::json(&json!({"error": "solver task failed", "kind": "internal"})),
                StatusCode::INTERNAL_SERVER_ERROR,
            )
        }
    }
}

fn error_reply(err: &ServiceError) -> WithStatus<Json> {
    let status = match err {
        ServiceError::UnknownMethod(_) => StatusCode::NOT_FOUND,
        ServiceError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_REQUEST,
    };
    info!(kind = err.kind(), %err, "request rejected");
    warp::reply::with_status(
        warp::reply::json(&json!({"error": err.to_string(), "kind": err.kind()})),
        status,
    )
}
