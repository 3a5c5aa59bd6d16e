//! Forwarding error definitions.

use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::Response;
use thiserror::Error;

use crate::proxy::cors;

/// Errors that can occur while forwarding a request upstream.
///
/// Every variant maps to the same wire shape: HTTP 500 with a JSON body
/// `{"error": "Proxy Server Error", "details": ..., "url": ...}`. The
/// distinction exists for logs and metrics, not for the caller.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Upstream connection or transport failure.
    #[error("upstream request failed: {0}")]
    Connect(String),

    /// Upstream call exceeded the configured deadline.
    #[error("upstream timed out after {0} seconds")]
    Timeout(u64),

    /// Inbound request body could not be read or re-serialized.
    #[error("invalid request body: {0}")]
    Body(String),

    /// Upstream response body could not be read or re-serialized.
    #[error("invalid upstream response: {0}")]
    UpstreamBody(String),

    /// Upstream origin or rewritten URI is malformed.
    #[error("invalid upstream uri: {0}")]
    Uri(String),
}

impl ProxyError {
    /// Render the fixed 500 error shape, CORS headers included.
    pub fn to_response(&self, path: &str) -> Response {
        let body = serde_json::json!({
            "error": "Proxy Server Error",
            "details": self.to_string(),
            "url": path,
        });

        let mut response = Response::new(Body::from(body.to_string()));
        *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        cors::apply(response.headers_mut());
        response
    }
}
