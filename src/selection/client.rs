//! Location API client.
//!
//! # Responsibilities
//! - Fetch option lists for each hierarchy level
//! - Attach the session's bearer token to every call
//! - Enforce the configured per-call timeout and retry policy
//! - Map every failure to a typed `SelectionError`
//!
//! # Endpoints
//! - `GET /states`
//! - `GET /districts` (preference hierarchies start here, no state parent)
//! - `GET /states/{id}/districts`
//! - `GET /districts/{id}/mandals`
//! - `GET /mandals/{id}/villages`

use reqwest::header::AUTHORIZATION;
use std::time::Duration;
use url::Url;

use crate::config::{LocationApiConfig, RetryConfig};
use crate::observability::metrics;
use crate::resilience::delay_for_attempt;
use crate::selection::session::Session;
use crate::selection::types::{Level, LocationOption, SelectionError, SelectionResult};

/// HTTP client for the location hierarchy endpoints.
#[derive(Debug, Clone)]
pub struct LocationClient {
    http: reqwest::Client,
    base_url: Url,
    retry: RetryConfig,
    timeout_secs: u64,
}

impl LocationClient {
    pub fn new(config: &LocationApiConfig) -> SelectionResult<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| SelectionError::Config(format!("base_url: {e}")))?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SelectionError::Config(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            retry: config.retry.clone(),
            timeout_secs: config.timeout_secs,
        })
    }

    /// Fetch the option list for one level, keyed by its parent's id.
    ///
    /// These are GETs, so transport failures and timeouts are retried per
    /// the configured policy; HTTP error statuses are returned immediately.
    pub async fn fetch_level(
        &self,
        session: &Session,
        level: Level,
        parent_id: Option<&str>,
    ) -> SelectionResult<Vec<LocationOption>> {
        let url = self.level_url(level, parent_id)?;
        let max_attempts = if self.retry.enabled {
            self.retry.max_attempts.max(1)
        } else {
            1
        };

        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.attempt(session, &url).await {
                Ok(options) => {
                    metrics::record_location_fetch(level.as_str(), true);
                    return Ok(options);
                }
                Err(e @ (SelectionError::Transport(_) | SelectionError::Timeout(_)))
                    if attempt < max_attempts =>
                {
                    tracing::info!(
                        level = %level,
                        attempt,
                        error = %e,
                        "Retrying option fetch"
                    );
                    tokio::time::sleep(delay_for_attempt(attempt, &self.retry)).await;
                }
                Err(e) => {
                    metrics::record_location_fetch(level.as_str(), false);
                    return Err(e);
                }
            }
        }
    }

    async fn attempt(&self, session: &Session, url: &Url) -> SelectionResult<Vec<LocationOption>> {
        let response = self
            .http
            .get(url.clone())
            .header(AUTHORIZATION, session.bearer())
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let message = upstream_error_text(response).await;
            return Err(SelectionError::Status {
                code: status.as_u16(),
                message,
            });
        }

        response
            .json::<Vec<LocationOption>>()
            .await
            .map_err(|e| SelectionError::Decode(e.to_string()))
    }

    fn map_send_error(&self, error: reqwest::Error) -> SelectionError {
        if error.is_timeout() {
            SelectionError::Timeout(self.timeout_secs)
        } else {
            SelectionError::Transport(error.to_string())
        }
    }

    fn level_url(&self, level: Level, parent_id: Option<&str>) -> SelectionResult<Url> {
        let path = match level {
            Level::State => "states".to_string(),
            Level::District => match parent_id {
                Some(id) => format!("states/{id}/districts"),
                None => "districts".to_string(),
            },
            Level::Mandal => format!(
                "districts/{}/mandals",
                parent_id.ok_or(SelectionError::MissingParent(level))?
            ),
            Level::Village => format!(
                "mandals/{}/villages",
                parent_id.ok_or(SelectionError::MissingParent(level))?
            ),
        };

        let joined = format!("{}/{}", self.base_url.as_str().trim_end_matches('/'), path);
        Url::parse(&joined).map_err(|e| SelectionError::Config(e.to_string()))
    }
}

/// Pull the upstream's `error` field out of a failure body, if it has one.
async fn upstream_error_text(response: reqwest::Response) -> String {
    match response.json::<serde_json::Value>().await {
        Ok(body) => body
            .get("error")
            .and_then(|v| v.as_str())
            .unwrap_or("request failed")
            .to_string(),
        Err(_) => "request failed".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LocationApiConfig;

    fn client() -> LocationClient {
        LocationClient::new(&LocationApiConfig {
            base_url: "http://127.0.0.1:9000/api/".into(),
            ..LocationApiConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_level_urls() {
        let c = client();
        assert_eq!(
            c.level_url(Level::State, None).unwrap().as_str(),
            "http://127.0.0.1:9000/api/states"
        );
        assert_eq!(
            c.level_url(Level::District, Some("1")).unwrap().as_str(),
            "http://127.0.0.1:9000/api/states/1/districts"
        );
        assert_eq!(
            c.level_url(Level::District, None).unwrap().as_str(),
            "http://127.0.0.1:9000/api/districts"
        );
        assert_eq!(
            c.level_url(Level::Village, Some("31")).unwrap().as_str(),
            "http://127.0.0.1:9000/api/mandals/31/villages"
        );
    }

    #[test]
    fn test_child_levels_require_parent() {
        let c = client();
        assert!(matches!(
            c.level_url(Level::Mandal, None),
            Err(SelectionError::MissingParent(Level::Mandal))
        ));
    }

    #[test]
    fn test_bad_base_url_rejected() {
        let config = LocationApiConfig {
            base_url: "not a url".into(),
            ..LocationApiConfig::default()
        };
        assert!(matches!(
            LocationClient::new(&config),
            Err(SelectionError::Config(_))
        ));
    }
}
