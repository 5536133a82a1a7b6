//! Handler failure record
//!
//! Every fallible handler operation produces at most one `HandlerError` and
//! returns it to its caller; the dispatcher is the only place it is turned
//! into a client-visible response and a log entry.

use hyper::StatusCode;
use std::backtrace::Backtrace;

/// Underlying failure attached to a `HandlerError` for diagnostics.
///
/// Logged together with the message and stack trace, never sent to the client.
pub type Cause = Box<dyn std::error::Error + Send + Sync>;

/// Immutable description of a request-handling failure.
///
/// `message` is public-facing text and is sent verbatim as the response body;
/// keep sensitive detail in `cause`, which only reaches the log.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct HandlerError {
    #[source]
    cause: Option<Cause>,
    message: String,
    status: StatusCode,
    stack_trace: String,
}

impl HandlerError {
    /// Creates a failure record, capturing the current call stack eagerly so
    /// the trace reflects the failure site rather than the eventual log site.
    ///
    /// `status` is expected to be a 4xx or 5xx code; this is a convention of
    /// the callers, checked only in debug builds.
    pub fn new(cause: Option<Cause>, message: impl Into<String>, status: StatusCode) -> Self {
        debug_assert!(
            status.is_client_error() || status.is_server_error(),
            "handler errors carry 4xx/5xx status codes, got {status}"
        );
        Self {
            cause,
            message: message.into(),
            status,
            stack_trace: capture_trace(),
        }
    }

    /// Same as [`HandlerError::new`] with status 500.
    pub fn internal(cause: Option<Cause>, message: impl Into<String>) -> Self {
        Self::new(cause, message, StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Convenience for a 404 failure with no cause attached.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(None, message, StatusCode::NOT_FOUND)
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn status(&self) -> StatusCode {
        self.status
    }

    pub fn cause(&self) -> Option<&(dyn std::error::Error + Send + Sync)> {
        self.cause.as_deref()
    }

    pub fn stack_trace(&self) -> &str {
        &self.stack_trace
    }
}

/// Returns a textual snapshot of the current call stack.
///
/// The frames for the capture itself and the `HandlerError` constructors are
/// trimmed, so the first listed frame is the failure site.
///
/// Frame introspection is a platform capability; where the runtime cannot
/// walk frames the returned text says so instead of listing them.
pub fn capture_trace() -> String {
    trim_capture_frames(&Backtrace::force_capture().to_string())
}

/// Drops the leading frames that belong to trace capture and `HandlerError`
/// construction from a rendered backtrace.
///
/// Backtrace text lists one numbered header line per frame, each optionally
/// followed by an indented `at <file>:<line>` line. If trimming would remove
/// every line the input is returned unchanged, since text that does not look
/// like a frame listing (the platform's "unsupported" message, say) has
/// nothing to trim.
fn trim_capture_frames(raw: &str) -> String {
    fn is_frame_header(line: &str) -> bool {
        line.trim_start()
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_digit())
    }

    let mut kept: Vec<&str> = Vec::new();
    let mut skipping = true;
    for line in raw.lines() {
        if skipping {
            if is_frame_header(line) {
                if line.contains("capture_trace") || line.contains("HandlerError") {
                    continue;
                }
                skipping = false;
            } else {
                // A continuation line of a skipped frame, or preamble text.
                continue;
            }
        }
        kept.push(line);
    }

    if kept.is_empty() {
        raw.to_string()
    } else {
        kept.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_records_message_and_status() {
        let err = HandlerError::new(None, "nope", StatusCode::FORBIDDEN);
        assert_eq!(err.message(), "nope");
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
        assert!(err.cause().is_none());
    }

    #[test]
    fn internal_defaults_to_500() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        let err = HandlerError::internal(Some(Box::new(io)), "store put failed");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.cause().is_some());
    }

    #[test]
    fn cause_is_exposed_as_source() {
        use std::error::Error as _;
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = HandlerError::internal(Some(Box::new(io)), "lookup failed");
        assert!(err.source().is_some());
    }

    #[test]
    fn trace_is_captured_at_construction() {
        let err = HandlerError::not_found("missing");
        // Either a real frame listing or the platform's "unsupported" text;
        // never empty.
        assert!(!err.stack_trace().is_empty());
    }

    #[test]
    fn display_is_the_public_message() {
        let err = HandlerError::not_found("Not found");
        assert_eq!(err.to_string(), "Not found");
    }

    #[test]
    fn capture_and_constructor_frames_are_trimmed() {
        let raw = "   0: acme_gate::error::capture_trace\n             at ./src/error.rs:80:5\n   1: acme_gate::error::HandlerError::new\n             at ./src/error.rs:44:26\n   2: acme_gate::acme::handlers::require_admin\n             at ./src/acme/handlers.rs:61:21\n   3: tokio::runtime::task::core::poll\n";
        let trimmed = trim_capture_frames(raw);
        assert!(trimmed.starts_with("   2: acme_gate::acme::handlers::require_admin"));
        assert!(!trimmed.contains("capture_trace"));
        assert!(!trimmed.contains("HandlerError::new"));
    }

    #[test]
    fn non_frame_text_passes_through_unchanged() {
        let raw = "disabled backtrace";
        assert_eq!(trim_capture_frames(raw), raw);
    }

    #[test]
    fn captured_trace_does_not_start_in_the_constructors() {
        let err = HandlerError::not_found("missing");
        let first = err.stack_trace().lines().next().unwrap_or_default();
        assert!(!first.contains("capture_trace"));
        assert!(!first.contains("HandlerError"));
    }
}
