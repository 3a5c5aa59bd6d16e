//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check addresses and URLs actually parse
//! - Validate value ranges (timeouts > 0, attempts >= 1)
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: GatewayConfig -> Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::{GatewayConfig, RetryConfig};

/// A single semantic problem found in the configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("invalid bind address '{0}'")]
    BindAddress(String),

    #[error("invalid {field} URL '{value}': {reason}")]
    Url {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("{field} must be greater than zero")]
    ZeroTimeout { field: &'static str },

    #[error("{field}: max_attempts must be at least 1")]
    NoAttempts { field: &'static str },

    #[error("{field}: base_delay_ms exceeds max_delay_ms")]
    DelayRange { field: &'static str },

    #[error("invalid metrics address '{0}'")]
    MetricsAddress(String),
}

/// Validate a configuration, collecting every error found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }
    if config.listener.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout {
            field: "listener.request_timeout_secs",
        });
    }

    check_url(&mut errors, "upstream.origin", &config.upstream.origin);
    if config.upstream.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout {
            field: "upstream.timeout_secs",
        });
    }
    check_retry(&mut errors, "upstream.retry", &config.upstream.retry);

    check_url(&mut errors, "locations.base_url", &config.locations.base_url);
    if config.locations.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout {
            field: "locations.timeout_secs",
        });
    }
    check_retry(&mut errors, "locations.retry", &config.locations.retry);

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    match Url::parse(value) {
        Ok(url) => {
            if url.scheme() != "http" && url.scheme() != "https" {
                errors.push(ValidationError::Url {
                    field,
                    value: value.to_string(),
                    reason: format!("unsupported scheme '{}'", url.scheme()),
                });
            } else if url.host_str().is_none() {
                errors.push(ValidationError::Url {
                    field,
                    value: value.to_string(),
                    reason: "missing host".to_string(),
                });
            }
        }
        Err(e) => {
            errors.push(ValidationError::Url {
                field,
                value: value.to_string(),
                reason: e.to_string(),
            });
        }
    }
}

fn check_retry(errors: &mut Vec<ValidationError>, field: &'static str, retry: &RetryConfig) {
    if retry.max_attempts == 0 {
        errors.push(ValidationError::NoAttempts { field });
    }
    if retry.base_delay_ms > retry.max_delay_ms {
        errors.push(ValidationError::DelayRange { field });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&GatewayConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = GatewayConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.upstream.origin = "ftp://example.com".into();
        config.upstream.timeout_secs = 0;
        config.locations.retry.max_attempts = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut config = GatewayConfig::default();
        config.observability.metrics_address = "bogus".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert!(validate_config(&config).is_err());
    }
}
