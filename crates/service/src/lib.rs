//! The request/response boundary of the numeth solvers.
//!
//! [`solve`] takes a [`Method`] and a JSON parameter object, validates it
//! against the method's [`Schema`], runs the solver, and renders the result
//! as plain JSON. [`server::routes`] exposes the same operations over HTTP.
//!
//! ```
//! use numeth_service::{Method, solve};
//! use serde_json::json;
//!
//! let out = solve(
//!     Method::Trapezoid,
//!     &json!({"function": "x^2", "a": 0, "b": 1, "n": 2}),
//! )
//! .unwrap();
//! assert_eq!(out["integral"], json!(0.375));
//! ```

mod config;
mod error;
mod method;
mod schema;
mod solve;

pub mod server;

pub use config::{ConfigError, ServerConfig};
pub use error::ServiceError;
pub use method::{Method, UnknownMethod};
pub use schema::{Field, Kind, ParamError, Params, Requirement, Schema};
pub use solve::{derivative, solve};
