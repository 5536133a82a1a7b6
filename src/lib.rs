//! Minimal request-dispatch layer for a small web service.
//!
//! Handlers signal failure by returning a [`error::HandlerError`]; the
//! dispatcher is the single place a failure becomes a log entry and an HTTP
//! error response. Handlers compose with guards (validating or
//! preprocessing) that short-circuit to the error path, and request paths
//! match against `%name%` templates that extract path variables. On top of
//! the core sit the ACME challenge endpoints and their collaborators.

pub mod acme;
pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod render;
pub mod routing;
pub mod server;

pub use config::Config;
pub use error::{capture_trace, HandlerError};
pub use handler::{
    dispatch, dispatch_limited, handler_fn, Guard, Guarded, Handler, HandlerExt, HttpRequest,
    HttpResponse, DEFAULT_MAX_BODY_SIZE,
};
pub use routing::{MatchError, PathTemplate, PathVars, RouteTable};
