//! Caller identity
//!
//! The admin-identity collaborator: resolving who is making a request and
//! whether they hold the admin flag.

use crate::handler::HttpRequest;

/// The resolved caller identity.
#[derive(Debug, Clone, Default)]
pub struct Identity {
    pub authenticated: bool,
    pub admin: bool,
    pub email: Option<String>,
}

impl Identity {
    /// The unauthenticated caller.
    pub fn anonymous() -> Self {
        Self::default()
    }
}

/// Resolves the identity behind a request.
pub trait IdentityProvider: Send + Sync {
    fn identify(&self, req: &HttpRequest) -> Identity;
}

/// Identity provider backed by a single configured admin bearer token.
///
/// A request presenting `Authorization: Bearer <token>` with the configured
/// token is the admin; anything else is anonymous.
pub struct BearerTokenIdentity {
    admin_token: String,
    admin_email: String,
}

impl BearerTokenIdentity {
    pub fn new(admin_token: impl Into<String>, admin_email: impl Into<String>) -> Self {
        Self {
            admin_token: admin_token.into(),
            admin_email: admin_email.into(),
        }
    }
}

impl IdentityProvider for BearerTokenIdentity {
    fn identify(&self, req: &HttpRequest) -> Identity {
        // An unset token means admin access is disabled, not open.
        if self.admin_token.is_empty() {
            return Identity::anonymous();
        }

        let presented = req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));

        match presented {
            Some(token) if token == self.admin_token => Identity {
                authenticated: true,
                admin: true,
                email: Some(self.admin_email.clone()),
            },
            _ => Identity::anonymous(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::body::Bytes;
    use hyper::Request;

    fn request(auth: Option<&str>) -> HttpRequest {
        let mut builder = Request::builder().uri("/acme-secret");
        if let Some(value) = auth {
            builder = builder.header("Authorization", value);
        }
        builder.body(Bytes::new()).unwrap()
    }

    #[test]
    fn matching_token_is_admin() {
        let provider = BearerTokenIdentity::new("s3cret", "admin@example.com");
        let identity = provider.identify(&request(Some("Bearer s3cret")));
        assert!(identity.authenticated);
        assert!(identity.admin);
        assert_eq!(identity.email.as_deref(), Some("admin@example.com"));
    }

    #[test]
    fn wrong_token_is_anonymous() {
        let provider = BearerTokenIdentity::new("s3cret", "admin@example.com");
        let identity = provider.identify(&request(Some("Bearer nope")));
        assert!(!identity.authenticated);
        assert!(!identity.admin);
        assert!(identity.email.is_none());
    }

    #[test]
    fn empty_configured_token_disables_admin_access() {
        let provider = BearerTokenIdentity::new("", "admin@example.com");
        let identity = provider.identify(&request(Some("Bearer ")));
        assert!(!identity.admin);
    }

    #[test]
    fn missing_header_is_anonymous() {
        let provider = BearerTokenIdentity::new("s3cret", "admin@example.com");
        let identity = provider.identify(&request(None));
        assert!(!identity.admin);
    }
}
