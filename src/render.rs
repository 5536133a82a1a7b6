//! Template rendering helpers
//!
//! Named helpers a templating collaborator can call, declared as a typed
//! registry instead of a dynamically typed function map. The only helper so
//! far inlines a file as an RFC 2397 `data:` URI.

use crate::error::HandlerError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hyper::StatusCode;
use std::path::Path;

/// Encodes `data` as a `data:` URI with the given content type.
pub fn data_url(data: &[u8], content_type: &str) -> String {
    format!("data:{};base64,{}", content_type, STANDARD.encode(data))
}

/// Reads `path` and encodes its contents as a `data:` URI.
pub async fn inline(path: impl AsRef<Path>, content_type: &str) -> std::io::Result<String> {
    let data = tokio::fs::read(path).await?;
    Ok(data_url(&data, content_type))
}

/// The registry of rendering helpers, one variant per helper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Helper {
    /// `inline(file, content_type)` renders file contents as a `data:` URI.
    Inline,
}

impl Helper {
    /// Looks a helper up by its template-facing name.
    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "inline" => Some(Self::Inline),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Inline => "inline",
        }
    }

    /// Applies the helper to its positional arguments.
    pub async fn apply(self, args: &[&str]) -> Result<String, HandlerError> {
        match self {
            Self::Inline => {
                let [file, content_type] = args else {
                    return Err(HandlerError::new(
                        None,
                        format!("helper {:?} expects (file, content_type)", self.name()),
                        StatusCode::BAD_REQUEST,
                    ));
                };
                inline(file, content_type).await.map_err(|e| {
                    HandlerError::internal(
                        Some(Box::new(e)),
                        format!("failed to inline {file:?}"),
                    )
                })
            }
        }
    }
}
