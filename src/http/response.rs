//! HTTP response building
//!
//! Small builders for the plain-text responses the dispatcher and the ACME
//! endpoints produce. Responses are built whole, so status, headers and body
//! are always finalized together before anything reaches the wire.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

/// Body type used everywhere in this crate.
pub type ResponseBody = Full<Bytes>;

/// Build a `text/plain` response with the given status.
pub fn text_response(status: StatusCode, body: impl Into<Bytes>) -> Response<ResponseBody> {
    Response::builder()
        .status(status)
        .header("Content-Type", "text/plain; charset=utf-8")
        .body(Full::new(body.into()))
        .unwrap_or_else(|e| {
            tracing::error!("failed to build {status} response: {e}");
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build the client-visible form of a handler failure: the failure's status
/// with its public message as the body.
pub fn error_response(status: StatusCode, message: &str) -> Response<ResponseBody> {
    text_response(status, message.to_owned())
}

/// Build a plain 200 response.
pub fn ok_response(body: impl Into<Bytes>) -> Response<ResponseBody> {
    text_response(StatusCode::OK, body)
}
