//! ACME challenge endpoints
//!
//! Saving the challenge secret (admin only) and serving the well-known
//! challenge response. Admin access is enforced through the guard machinery
//! rather than inside the handlers: `authenticate` resolves the caller's
//! identity into the request, `require_admin` rejects non-admins.

use super::identity::{Identity, IdentityProvider};
use super::store::{AcmeSecret, SecretStore, StoreError, CHALLENGE_ENTITY_ID};
use crate::error::HandlerError;
use crate::handler::{prepare, validate, Guard, Handler, HttpRequest, HttpResponse};
use crate::http::ok_response;
use crate::routing::PathVars;
use async_trait::async_trait;
use chrono::Utc;
use hyper::StatusCode;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

/// URI prefix certificate issuers probe during domain verification.
pub const CHALLENGE_URI_PREFIX: &str = "/.well-known/acme-challenge/";

/// Preprocessing guard: resolves the caller's [`Identity`] and stores it in
/// the request extensions for downstream guards and handlers.
pub fn authenticate(provider: Arc<dyn IdentityProvider>) -> impl Guard {
    prepare(move |req| {
        let identity = provider.identify(req);
        req.extensions_mut().insert(identity);
        Ok(())
    })
}

/// Validating guard: fails with 403 unless [`authenticate`] established an
/// admin identity.
pub fn require_admin() -> impl Guard {
    validate(|req| {
        let is_admin = req
            .extensions()
            .get::<Identity>()
            .is_some_and(|identity| identity.admin);
        if is_admin {
            Ok(())
        } else {
            Err(HandlerError::new(
                None,
                "Only admin users can save ACME secrets.",
                StatusCode::FORBIDDEN,
            ))
        }
    })
}

#[derive(Debug, Deserialize)]
struct SaveForm {
    chal: String,
    resp: String,
}

impl SaveForm {
    /// Reads `chal`/`resp` from the urlencoded body, falling back to the
    /// query string. Unparsable or missing parameters are an explicit 400
    /// rather than silently empty values.
    fn from_request(req: &HttpRequest) -> Result<Self, HandlerError> {
        if !req.body().is_empty() {
            return serde_urlencoded::from_bytes(req.body()).map_err(|e| {
                HandlerError::new(
                    Some(Box::new(e)),
                    "Missing challenge parameters.",
                    StatusCode::BAD_REQUEST,
                )
            });
        }
        let query = req.uri().query().ok_or_else(|| {
            HandlerError::new(None, "Missing challenge parameters.", StatusCode::BAD_REQUEST)
        })?;
        serde_urlencoded::from_str(query).map_err(|e| {
            HandlerError::new(
                Some(Box::new(e)),
                "Missing challenge parameters.",
                StatusCode::BAD_REQUEST,
            )
        })
    }
}

/// Stores a new ACME secret under the singleton key.
pub struct SaveSecret {
    store: Arc<dyn SecretStore>,
}

impl SaveSecret {
    pub fn new(store: Arc<dyn SecretStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Handler for SaveSecret {
    async fn handle(&self, req: HttpRequest) -> Result<HttpResponse, HandlerError> {
        let form = SaveForm::from_request(&req)?;
        let updated_by = req
            .extensions()
            .get::<Identity>()
            .and_then(|identity| identity.email.clone())
            .unwrap_or_default();

        let secret = AcmeSecret {
            challenge: form.chal,
            response: form.resp,
            timestamp: Utc::now(),
            updated_by,
        };

        self.store
            .put(CHALLENGE_ENTITY_ID, &secret)
            .await
            .map_err(|e| HandlerError::internal(Some(Box::new(e)), "secret store put failed."))?;

        info!(challenge = %secret.challenge, "ACME secret updated");
        Ok(ok_response("OK"))
    }
}

/// Serves the stored challenge response when the requested token matches.
pub struct ServeChallenge {
    store: Arc<dyn SecretStore>,
}

impl ServeChallenge {
    pub fn new(store: Arc<dyn SecretStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Handler for ServeChallenge {
    async fn handle(&self, req: HttpRequest) -> Result<HttpResponse, HandlerError> {
        let secret = match self.store.get(CHALLENGE_ENTITY_ID).await {
            Ok(secret) => secret,
            Err(StoreError::NotFound(_)) => return Err(HandlerError::not_found("Not found")),
            Err(e) => {
                return Err(HandlerError::internal(
                    Some(Box::new(e)),
                    "secret store get failed.",
                ));
            }
        };

        let requested = requested_token(&req).ok_or_else(|| HandlerError::not_found("Not found"))?;
        if requested != secret.challenge {
            return Err(HandlerError::not_found("Not found"));
        }

        Ok(ok_response(secret.response))
    }
}

/// Token from the route capture, or from the path itself when the handler is
/// mounted without a template.
fn requested_token(req: &HttpRequest) -> Option<String> {
    if let Some(token) = req
        .extensions()
        .get::<PathVars>()
        .and_then(|vars| vars.get("token"))
    {
        return Some(token.to_owned());
    }
    req.uri()
        .path()
        .strip_prefix(CHALLENGE_URI_PREFIX)
        .map(ToOwned::to_owned)
}
