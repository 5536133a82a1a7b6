//! Request handler module
//!
//! The unit of request handling and the dispatcher that turns handler
//! failures into client-visible responses. A handler either fully builds a
//! response (`Ok`) or returns exactly one [`HandlerError`] (`Err`); it can
//! never do both, so the "no partial write before an error" contract holds by
//! construction.

pub mod guard;

pub use guard::{prepare, validate, Guard, Guarded};

use crate::error::HandlerError;
use crate::http::{error_response, ResponseBody};
use async_trait::async_trait;
use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::Bytes;
use hyper::{Request, Response, StatusCode};
use std::future::Future;
use tracing::error;

/// Request as seen by handlers: the body has already been collected by the
/// dispatcher, so handlers and guards work on plain bytes.
pub type HttpRequest = Request<Bytes>;

/// Response produced by handlers.
pub type HttpResponse = Response<ResponseBody>;

/// The unit of request processing.
///
/// Returning `Ok` means the handler built the complete response itself;
/// returning `Err` hands the failure to the dispatcher, which owns writing
/// the error response and the log entry.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, req: HttpRequest) -> Result<HttpResponse, HandlerError>;
}

/// Adapter that lifts a plain async function into a [`Handler`].
pub struct HandlerFn<F> {
    f: F,
}

/// Wraps `async fn(HttpRequest) -> Result<HttpResponse, HandlerError>` as a
/// [`Handler`].
pub fn handler_fn<F, Fut>(f: F) -> HandlerFn<F>
where
    F: Fn(HttpRequest) -> Fut + Send + Sync,
    Fut: Future<Output = Result<HttpResponse, HandlerError>> + Send,
{
    HandlerFn { f }
}

#[async_trait]
impl<F, Fut> Handler for HandlerFn<F>
where
    F: Fn(HttpRequest) -> Fut + Send + Sync,
    Fut: Future<Output = Result<HttpResponse, HandlerError>> + Send,
{
    async fn handle(&self, req: HttpRequest) -> Result<HttpResponse, HandlerError> {
        (self.f)(req).await
    }
}

/// Builder-style composition helpers for handlers.
pub trait HandlerExt: Handler + Sized {
    /// Runs `guard` before this handler; a guard failure short-circuits to
    /// the dispatcher's error path. The outermost guard runs first.
    fn guarded<G: Guard>(self, guard: G) -> Guarded<G, Self> {
        Guarded::new(guard, self)
    }
}

impl<H: Handler + Sized> HandlerExt for H {}

/// Cap on buffered request bodies when no configured value is supplied.
pub const DEFAULT_MAX_BODY_SIZE: u64 = 10 * 1024 * 1024; // 10 MB

/// Serves one request through `handler`, producing the final response the
/// hosting runtime writes to the wire.
///
/// The request body is collected up front so handlers see [`HttpRequest`].
/// A non-`Ok` handler result is logged as one combined entry (message, cause
/// and stack trace) and converted into a response whose status comes from the
/// failure record and whose body is the public message, verbatim. An `Ok`
/// result passes through untouched.
///
/// Bodies are buffered up to [`DEFAULT_MAX_BODY_SIZE`]; the server wires the
/// configured cap through [`dispatch_limited`].
pub async fn dispatch<H, B>(handler: &H, req: Request<B>) -> HttpResponse
where
    H: Handler + ?Sized,
    B: hyper::body::Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    dispatch_limited(handler, req, DEFAULT_MAX_BODY_SIZE).await
}

/// Same as [`dispatch`] with an explicit cap on how many body bytes are
/// buffered before the handler runs.
///
/// A body that exceeds the cap is rejected with 413 and never reaches the
/// handler; any other body-read failure becomes an internal `HandlerError`.
pub async fn dispatch_limited<H, B>(
    handler: &H,
    req: Request<B>,
    max_body_size: u64,
) -> HttpResponse
where
    H: Handler + ?Sized,
    B: hyper::body::Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let (parts, body) = req.into_parts();
    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    let bytes = match Limited::new(body, limit).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            let err = HandlerError::new(
                Some(e),
                "Request body too large.",
                StatusCode::PAYLOAD_TOO_LARGE,
            );
            return serve_error(&err);
        }
        Err(e) => {
            let err = HandlerError::internal(Some(e), "failed to read request body");
            return serve_error(&err);
        }
    };

    match handler.handle(Request::from_parts(parts, bytes)).await {
        Ok(response) => response,
        Err(err) => serve_error(&err),
    }
}

/// The single place a [`HandlerError`] becomes a log entry and a response.
fn serve_error(err: &HandlerError) -> HttpResponse {
    error!(
        status = err.status().as_u16(),
        cause = ?err.cause(),
        "{}\n{}",
        err.message(),
        err.stack_trace()
    );
    error_response(err.status(), err.message())
}
