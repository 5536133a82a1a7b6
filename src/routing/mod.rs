//! Routing module
//!
//! Path-template matching and the ordered route table that dispatches to
//! handlers. Deliberately small: no method dispatch, no wildcard segments,
//! no nested route trees.

pub mod template;

pub use template::{MatchError, PathTemplate};

use crate::error::HandlerError;
use crate::handler::{Handler, HttpRequest, HttpResponse};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Variables captured from the matched route template, made available to the
/// route's handler through the request extensions.
#[derive(Debug, Clone, Default)]
pub struct PathVars(HashMap<String, String>);

impl PathVars {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<HashMap<String, String>> for PathVars {
    fn from(vars: HashMap<String, String>) -> Self {
        Self(vars)
    }
}

/// Ordered list of `(template, handler)` pairs; the first template that
/// matches the request path wins.
///
/// The table is itself a [`Handler`], so it plugs straight into the
/// dispatcher. A path no template matches is a 404 failure; the matcher's
/// own error variants never leave this module.
#[derive(Default)]
pub struct RouteTable {
    routes: Vec<(PathTemplate, Arc<dyn Handler>)>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a route. Templates are probed in registration order.
    #[must_use]
    pub fn route(mut self, format: &str, handler: Arc<dyn Handler>) -> Self {
        self.routes.push((PathTemplate::parse(format), handler));
        self
    }
}

#[async_trait]
impl Handler for RouteTable {
    async fn handle(&self, mut req: HttpRequest) -> Result<HttpResponse, HandlerError> {
        let path = req.uri().path().to_owned();

        for (template, handler) in &self.routes {
            if let Ok(vars) = template.capture(&path) {
                debug!(template = template.as_str(), %path, "route matched");
                req.extensions_mut().insert(PathVars::from(vars));
                return handler.handle(req).await;
            }
        }

        Err(HandlerError::not_found("Not found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::{dispatch, handler_fn};
    use crate::http::ok_response;
    use http_body_util::Full;
    use hyper::body::Bytes;
    use hyper::{Request, StatusCode};

    fn request(path: &str) -> Request<Full<Bytes>> {
        Request::builder()
            .uri(path)
            .body(Full::new(Bytes::new()))
            .unwrap()
    }

    fn echo_var(name: &'static str) -> Arc<dyn Handler> {
        Arc::new(handler_fn(move |req: HttpRequest| async move {
            let value = req
                .extensions()
                .get::<PathVars>()
                .and_then(|vars| vars.get(name))
                .unwrap_or("none")
                .to_owned();
            Ok(ok_response(value))
        }))
    }

    async fn body_text(resp: HttpResponse) -> String {
        let bytes = http_body_util::BodyExt::collect(resp.into_body())
            .await
            .unwrap()
            .to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn matched_route_sees_captured_variables() {
        let table = RouteTable::new().route("/customer/%id%/edit", echo_var("id"));
        let resp = dispatch(&table, request("/customer/44/edit")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_text(resp).await, "44");
    }

    #[tokio::test]
    async fn first_matching_template_wins() {
        let table = RouteTable::new()
            .route("/customer/%id%", echo_var("id"))
            .route("/%anything%/%id%", echo_var("anything"));
        let resp = dispatch(&table, request("/customer/7")).await;
        assert_eq!(body_text(resp).await, "7");
    }

    #[tokio::test]
    async fn unmatched_path_is_404() {
        let table = RouteTable::new().route("/customer/%id%", echo_var("id"));
        let resp = dispatch(&table, request("/orders/1/2")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_text(resp).await, "Not found");
    }
}
