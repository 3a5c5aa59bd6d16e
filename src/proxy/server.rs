//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Create the Axum router with the catch-all forwarding handler
//! - Wire up middleware (request ID, tracing, request deadline)
//! - Short-circuit OPTIONS with the CORS preflight response
//! - Hand everything else to the forwarder and attach CORS headers
//! - Bind the server to a listener and serve until shutdown

use axum::{
    body::Body,
    extract::State,
    http::{HeaderValue, Method, Request},
    response::Response,
    routing::any,
    Router,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

use crate::config::GatewayConfig;
use crate::observability::metrics;
use crate::proxy::cors;
use crate::proxy::error::ProxyError;
use crate::proxy::forward::Forwarder;

/// Application state injected into the handler.
#[derive(Clone)]
struct AppState {
    forwarder: Arc<Forwarder>,
    request_deadline: Duration,
}

/// Request ID maker backed by UUID v4, attached as `x-request-id`.
#[derive(Clone, Default)]
struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// HTTP server fronting the fixed upstream origin.
pub struct ProxyServer {
    router: Router,
}

impl ProxyServer {
    /// Create a new server from a validated configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, ProxyError> {
        let forwarder = Arc::new(Forwarder::new(&config.upstream)?);
        let state = AppState {
            forwarder,
            request_deadline: Duration::from_secs(config.listener.request_timeout_secs),
        };
        let router = Self::build_router(state);
        Ok(Self { router })
    }

    /// Build the Axum router with all middleware layers. The request
    /// deadline lives in the handler rather than a timeout layer so that
    /// an expired request still gets the JSON error shape and CORS
    /// headers instead of a synthesized bare 408.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(gateway_handler))
            .route("/", any(gateway_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id()),
            )
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Gateway server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Gateway server stopped");
        Ok(())
    }
}

/// Catch-all handler: OPTIONS short-circuits, everything else is forwarded.
async fn gateway_handler(
    State(state): State<AppState>,
    request: Request<Body>,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    if method == Method::OPTIONS {
        tracing::debug!(request_id = %request_id, path = %path, "CORS preflight");
        metrics::record_request(method.as_str(), 200, start);
        return cors::preflight();
    }

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        "Forwarding request"
    );

    let deadline = state.request_deadline;
    let forwarded = match tokio::time::timeout(deadline, state.forwarder.forward(request)).await {
        Ok(outcome) => outcome,
        Err(_) => Err(ProxyError::Timeout(deadline.as_secs())),
    };

    match forwarded {
        Ok(mut response) => {
            cors::apply(response.headers_mut());
            let status = response.status().as_u16();
            metrics::record_request(method.as_str(), status, start);
            tracing::debug!(request_id = %request_id, status, "Relayed upstream response");
            response
        }
        Err(e) => {
            report_failure(&request_id, &path, &e);
            metrics::record_request(method.as_str(), 500, start);
            e.to_response(&path)
        }
    }
}

fn report_failure(request_id: &str, path: &str, error: &ProxyError) {
    tracing::error!(
        request_id = %request_id,
        path = %path,
        error = %error,
        "Forwarding failed"
    );
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        return;
    }
    tracing::info!("Shutdown signal received");
}
