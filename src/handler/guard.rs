//! Guarded dispatch
//!
//! One composition primitive covers both guard shapes: a validating guard is
//! a pure predicate over the request, a preprocessing guard may also rewrite
//! the request (typically by inserting values into its extensions) before the
//! inner handler runs. Either way a guard failure is the composed handler's
//! result and the inner handler is never invoked.

use super::{Handler, HttpRequest, HttpResponse};
use crate::error::HandlerError;
use async_trait::async_trait;

/// A pre-step run before a handler to short-circuit processing on failure.
#[async_trait]
pub trait Guard: Send + Sync {
    async fn check(&self, req: &mut HttpRequest) -> Result<(), HandlerError>;
}

/// A handler composed of exactly one guard and one inner handler.
pub struct Guarded<G, H> {
    guard: G,
    inner: H,
}

impl<G, H> Guarded<G, H> {
    pub const fn new(guard: G, inner: H) -> Self {
        Self { guard, inner }
    }
}

#[async_trait]
impl<G, H> Handler for Guarded<G, H>
where
    G: Guard,
    H: Handler,
{
    async fn handle(&self, mut req: HttpRequest) -> Result<HttpResponse, HandlerError> {
        self.guard.check(&mut req).await?;
        self.inner.handle(req).await
    }
}

/// Validating guard built from a pure predicate over the request.
pub struct ValidateFn<F> {
    f: F,
}

/// Wraps `Fn(&HttpRequest) -> Result<(), HandlerError>` as a [`Guard`] that
/// can only inspect the request.
pub fn validate<F>(f: F) -> ValidateFn<F>
where
    F: Fn(&HttpRequest) -> Result<(), HandlerError> + Send + Sync,
{
    ValidateFn { f }
}

#[async_trait]
impl<F> Guard for ValidateFn<F>
where
    F: Fn(&HttpRequest) -> Result<(), HandlerError> + Send + Sync,
{
    async fn check(&self, req: &mut HttpRequest) -> Result<(), HandlerError> {
        (self.f)(req)
    }
}

/// Preprocessing guard built from a function that may rewrite the request.
pub struct PrepareFn<F> {
    f: F,
}

/// Wraps `Fn(&mut HttpRequest) -> Result<(), HandlerError>` as a [`Guard`].
///
/// On failure the guard must leave the request usable only for the error
/// path; it must not have produced any client-visible effect, which the
/// `Result` shape already rules out.
pub fn prepare<F>(f: F) -> PrepareFn<F>
where
    F: Fn(&mut HttpRequest) -> Result<(), HandlerError> + Send + Sync,
{
    PrepareFn { f }
}

#[async_trait]
impl<F> Guard for PrepareFn<F>
where
    F: Fn(&mut HttpRequest) -> Result<(), HandlerError> + Send + Sync,
{
    async fn check(&self, req: &mut HttpRequest) -> Result<(), HandlerError> {
        (self.f)(req)
    }
}
