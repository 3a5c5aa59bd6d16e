//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address, request timeout).
    pub listener: ListenerConfig,

    /// Upstream origin the forwarder relays every request to.
    pub upstream: UpstreamConfig,

    /// Location API settings for the selection engine client.
    pub locations: LocationApiConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Whole-request deadline enforced at the middleware layer, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 75,
        }
    }
}

/// Upstream origin configuration for the forwarder.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Origin every request is forwarded to (e.g., "http://127.0.0.1:9000").
    /// Paths are passed through verbatim; only scheme and authority come
    /// from here.
    pub origin: String,

    /// Per-attempt upstream call timeout, in seconds.
    pub timeout_secs: u64,

    /// Largest request or response body the forwarder will buffer, in bytes.
    pub max_body_bytes: usize,

    /// Retry policy for idempotent requests (GET/HEAD only).
    pub retry: RetryConfig,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            origin: "http://127.0.0.1:9000".to_string(),
            timeout_secs: 30,
            max_body_bytes: 32 * 1024 * 1024,
            retry: RetryConfig::default(),
        }
    }
}

/// Location API configuration for the selection engine.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LocationApiConfig {
    /// Base URL of the location REST API (e.g., "http://127.0.0.1:9000/api").
    pub base_url: String,

    /// Per-call timeout, in seconds.
    pub timeout_secs: u64,

    /// Retry policy for option-list fetches.
    pub retry: RetryConfig,
}

impl Default for LocationApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:9000/api".to_string(),
            timeout_secs: 10,
            retry: RetryConfig::default(),
        }
    }
}

/// Retry configuration shared by the forwarder and the location client.
///
/// The source system had no timeout or retry contract at all; the policy is
/// exposed here as configuration rather than hardcoded so deployments can
/// turn it off and recover the original behavior.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Whether retries are attempted at all.
    pub enabled: bool,

    /// Total attempts, including the first (2 = single retry).
    pub max_attempts: u32,

    /// Base delay for exponential backoff, in milliseconds.
    pub base_delay_ms: u64,

    /// Upper bound on a single backoff delay, in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_attempts: 2,
            base_delay_ms: 100,
            max_delay_ms: 1_000,
        }
    }
}

/// Observability settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Whether the Prometheus metrics endpoint is served.
    pub metrics_enabled: bool,

    /// Address the metrics endpoint binds to.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9100".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GatewayConfig::default();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.upstream.timeout_secs, 30);
        assert!(config.upstream.retry.enabled);
        assert_eq!(config.upstream.retry.max_attempts, 2);
        assert!(!config.observability.metrics_enabled);
    }

    #[test]
    fn test_minimal_toml() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [upstream]
            origin = "http://10.0.0.5:3000"
            "#,
        )
        .unwrap();
        assert_eq!(config.upstream.origin, "http://10.0.0.5:3000");
        // Untouched sections keep their defaults.
        assert_eq!(config.locations.timeout_secs, 10);
    }
}
