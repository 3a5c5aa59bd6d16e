//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): proxied requests by method, status
//! - `gateway_request_duration_seconds` (histogram): end-to-end latency
//! - `gateway_upstream_retries_total` (counter): retried upstream attempts
//! - `gateway_location_fetches_total` (counter): option-list fetches by level, outcome
//!
//! # Design Decisions
//! - Low-overhead updates (atomic operations behind the metrics macros)
//! - Prometheus exposition on a separate listener, enabled via config

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and exposition endpoint.
///
/// Must run inside a Tokio runtime. Failure is logged, not fatal; the
/// gateway serves traffic without metrics.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => {
            tracing::info!(address = %addr, "Metrics endpoint started");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to install metrics exporter");
        }
    }
}

/// Record one completed proxied request.
pub fn record_request(method: &str, status: u16, start: Instant) {
    counter!(
        "gateway_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("gateway_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record one retried upstream attempt.
pub fn record_upstream_retry(method: &str) {
    counter!("gateway_upstream_retries_total", "method" => method.to_string()).increment(1);
}

/// Record one option-list fetch by the selection engine client.
pub fn record_location_fetch(level: &str, ok: bool) {
    counter!(
        "gateway_location_fetches_total",
        "level" => level.to_string(),
        "outcome" => if ok { "ok" } else { "error" }
    )
    .increment(1);
}
