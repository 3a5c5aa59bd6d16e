//! Upstream forwarding.
//!
//! # Responsibilities
//! - Rewrite the request URI onto the fixed upstream origin (path verbatim)
//! - Scrub hop-relevant request headers (host, content-length, accept-encoding)
//! - Normalize non-multipart request bodies to JSON
//! - Relay the upstream response, dispatching on its content type
//! - Enforce the configured per-attempt timeout and retry policy
//!
//! # Design Decisions
//! - Prefix rewriting is deliberately an identity mapping: `/api/`, `/auth/`,
//!   `/admin/`, `/field-executive/` all pass through unchanged. The
//!   passthrough is a contract, not an accident.
//! - Bodies are buffered, not streamed; the content-type dispatch below
//!   needs the whole payload anyway.
//! - Retries apply to GET/HEAD only and are disabled entirely when the
//!   retry policy says so.

use axum::body::{to_bytes, Body, Bytes};
use axum::http::uri::{Authority, Parts as UriParts, PathAndQuery, Scheme};
use axum::http::{header, HeaderMap, HeaderValue, Method, Request, StatusCode, Uri};
use axum::response::Response;
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;
use std::time::Duration;
use tokio::time::timeout;

use crate::config::{RetryConfig, UpstreamConfig};
use crate::observability::metrics;
use crate::proxy::error::ProxyError;
use crate::resilience::delay_for_attempt;

const CACHE_ONE_YEAR: &str = "public, max-age=31536000";

/// Stateless forwarder bound to a single upstream origin.
pub struct Forwarder {
    client: Client<HttpConnector, Body>,
    scheme: Scheme,
    authority: Authority,
    timeout: Duration,
    retry: RetryConfig,
    max_body_bytes: usize,
}

impl Forwarder {
    /// Create a forwarder from the upstream section of the config.
    pub fn new(config: &UpstreamConfig) -> Result<Self, ProxyError> {
        let origin: Uri = config
            .origin
            .parse()
            .map_err(|e| ProxyError::Uri(format!("origin '{}': {}", config.origin, e)))?;
        let parts = origin.into_parts();
        let scheme = parts
            .scheme
            .ok_or_else(|| ProxyError::Uri(format!("origin '{}' has no scheme", config.origin)))?;
        let authority = parts
            .authority
            .ok_or_else(|| ProxyError::Uri(format!("origin '{}' has no host", config.origin)))?;

        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        Ok(Self {
            client,
            scheme,
            authority,
            timeout: Duration::from_secs(config.timeout_secs),
            retry: config.retry.clone(),
            max_body_bytes: config.max_body_bytes,
        })
    }

    /// Forward a request to the upstream origin and relay its response.
    pub async fn forward(&self, request: Request<Body>) -> Result<Response, ProxyError> {
        let (parts, body) = request.into_parts();
        let method = parts.method.clone();
        let path_and_query = parts
            .uri
            .path_and_query()
            .cloned()
            .unwrap_or_else(|| PathAndQuery::from_static("/"));

        let mut headers = parts.headers.clone();
        headers.remove(header::HOST);
        headers.remove(header::CONTENT_LENGTH);
        headers.remove(header::ACCEPT_ENCODING);

        let raw = to_bytes(body, self.max_body_bytes)
            .await
            .map_err(|e| ProxyError::Body(e.to_string()))?;
        let outbound = prepare_body(&method, &mut headers, raw)?;
        let uri = self.upstream_uri(&path_and_query)?;

        let retryable =
            self.retry.enabled && (method == Method::GET || method == Method::HEAD);
        let max_attempts = if retryable {
            self.retry.max_attempts.max(1)
        } else {
            1
        };

        let mut attempt = 0;
        loop {
            attempt += 1;

            let mut upstream_req = Request::builder()
                .method(method.clone())
                .uri(uri.clone())
                .body(Body::from(outbound.clone()))
                .map_err(|e| ProxyError::Body(e.to_string()))?;
            *upstream_req.headers_mut() = headers.clone();

            match timeout(self.timeout, self.client.request(upstream_req)).await {
                Ok(Ok(response)) => {
                    let status = response.status();
                    let response_headers = response.headers().clone();
                    let incoming: hyper::body::Incoming = response.into_body();
                    let body = to_bytes(Body::new(incoming), self.max_body_bytes)
                        .await
                        .map_err(|e| ProxyError::UpstreamBody(e.to_string()))?;
                    return transform_response(status, response_headers, body);
                }
                Ok(Err(e)) => {
                    if attempt < max_attempts {
                        metrics::record_upstream_retry(method.as_str());
                        tracing::info!(
                            attempt,
                            error = %e,
                            "Retrying upstream request after transport error"
                        );
                        tokio::time::sleep(delay_for_attempt(attempt, &self.retry)).await;
                        continue;
                    }
                    return Err(ProxyError::Connect(e.to_string()));
                }
                Err(_) => {
                    if attempt < max_attempts {
                        metrics::record_upstream_retry(method.as_str());
                        tracing::info!(attempt, "Retrying upstream request after timeout");
                        tokio::time::sleep(delay_for_attempt(attempt, &self.retry)).await;
                        continue;
                    }
                    return Err(ProxyError::Timeout(self.timeout.as_secs()));
                }
            }
        }
    }

    /// Splice the incoming path and query onto the upstream origin.
    fn upstream_uri(&self, path_and_query: &PathAndQuery) -> Result<Uri, ProxyError> {
        let mut parts = UriParts::default();
        parts.scheme = Some(self.scheme.clone());
        parts.authority = Some(self.authority.clone());
        parts.path_and_query = Some(path_and_query.clone());
        Uri::from_parts(parts).map_err(|e| ProxyError::Uri(e.to_string()))
    }
}

/// Normalize the outbound request body.
///
/// GET/HEAD bodies pass through unchanged, as do multipart uploads (binary
/// safe). Anything else must be JSON and is re-serialized with a forced
/// `Content-Type: application/json`, matching what the dashboard's forms
/// expect the backend to receive.
fn prepare_body(
    method: &Method,
    headers: &mut HeaderMap,
    body: Bytes,
) -> Result<Bytes, ProxyError> {
    if method == Method::GET || method == Method::HEAD {
        return Ok(body);
    }

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if content_type.contains("multipart/form-data") {
        return Ok(body);
    }

    // The JSON content type is forced even for empty bodies.
    if body.is_empty() {
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        return Ok(body);
    }

    let value: serde_json::Value =
        serde_json::from_slice(&body).map_err(|e| ProxyError::Body(e.to_string()))?;
    let normalized =
        serde_json::to_vec(&value).map_err(|e| ProxyError::Body(e.to_string()))?;
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    Ok(Bytes::from(normalized))
}

/// Relay an upstream response, branching on its content type.
fn transform_response(
    status: StatusCode,
    upstream_headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ProxyError> {
    let mut headers = HeaderMap::with_capacity(upstream_headers.len());
    for (name, value) in upstream_headers.iter() {
        if *name == header::CONTENT_ENCODING || *name == header::CONTENT_LENGTH {
            continue;
        }
        headers.insert(name.clone(), value.clone());
    }

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    let out_body = if content_type.contains("application/json") {
        let value: serde_json::Value =
            serde_json::from_slice(&body).map_err(|e| ProxyError::UpstreamBody(e.to_string()))?;
        let bytes =
            serde_json::to_vec(&value).map_err(|e| ProxyError::UpstreamBody(e.to_string()))?;
        Bytes::from(bytes)
    } else if content_type.contains("image/") {
        headers.insert(
            header::CACHE_CONTROL,
            HeaderValue::from_static(CACHE_ONE_YEAR),
        );
        body
    } else {
        // video/* and everything else: raw bytes, upstream headers as-is
        body
    };

    let mut response = Response::new(Body::from(out_body));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    Ok(response)
}
