//! Health check for the catalog upstream.
//!
//! Check: `GET {api_base}/configuration?api_key=..` must return 2xx.
//!
//! The returned [`HealthStatus`] is JSON-serializable and suitable for a `/health` endpoint.
//! [`HealthService::check`] is resilient and never fails (errors mapped to `ok=false`).

use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::catalog_config::{CatalogConfig, DEFAULT_TIMEOUT_SECS};
use crate::error_handler::{CatalogError, make_snippet};

/// A serializable health snapshot for the catalog upstream.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    /// Target REST base URL.
    pub endpoint: String,
    /// Overall health flag.
    pub ok: bool,
    /// Measured HTTP latency in milliseconds for the check.
    pub latency_ms: u128,
    /// Short human-readable message with details.
    pub message: String,
}

impl HealthStatus {
    #[inline]
    fn ok(endpoint: &str, latency_ms: u128, message: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            ok: true,
            latency_ms,
            message: message.into(),
        }
    }

    #[inline]
    fn fail(endpoint: &str, latency_ms: u128, message: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            ok: false,
            latency_ms,
            message: message.into(),
        }
    }
}

/// Health checker that reuses a single HTTP client.
pub struct HealthService {
    client: reqwest::Client,
    cfg: CatalogConfig,
}

impl HealthService {
    /// Creates a new health service for the given catalog config.
    ///
    /// # Errors
    /// Returns [`CatalogError::HttpTransport`] if the HTTP client cannot be built.
    pub fn new(cfg: CatalogConfig) -> Result<Self, CatalogError> {
        let timeout = Duration::from_secs(cfg.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS));
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        info!(
            endpoint = %cfg.api_base,
            timeout_secs = timeout.as_secs(),
            "catalog HealthService initialized"
        );

        Ok(Self { client, cfg })
    }

    /// Checks catalog reachability and key validity.
    ///
    /// This method never returns an error. Any failure is converted to
    /// `HealthStatus { ok: false, message: ... }`.
    pub async fn check(&self) -> HealthStatus {
        let start = Instant::now();
        match self.try_check().await {
            Ok(status) => {
                info!(
                    endpoint = %status.endpoint,
                    latency_ms = status.latency_ms,
                    "catalog health check completed"
                );
                status
            }
            Err(err) => {
                let status =
                    HealthStatus::fail(&self.cfg.api_base, start.elapsed().as_millis(), err.to_string());
                warn!(
                    endpoint = %status.endpoint,
                    latency_ms = status.latency_ms,
                    message = %status.message,
                    "catalog health check failed"
                );
                status
            }
        }
    }

    /// Strict check. Returns an error on hard failures.
    async fn try_check(&self) -> Result<HealthStatus, CatalogError> {
        let base = self.cfg.api_base.trim_end_matches('/');
        let url = format!("{base}/configuration");

        let start = Instant::now();
        debug!("GET {}", url);

        let resp = self
            .client
            .get(&url)
            .query(&[("api_key", self.cfg.api_key.as_str())])
            .send()
            .await
            .map_err(|e| CatalogError::HttpTransport(e.without_url()))?;

        let latency = start.elapsed().as_millis();

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(CatalogError::HttpStatus {
                status,
                url,
                snippet: make_snippet(&text),
            });
        }

        Ok(HealthStatus::ok(
            &self.cfg.api_base,
            latency,
            "catalog is reachable; API key accepted",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreachable_upstream_reports_not_ok() {
        // Port 9 (discard) on loopback is expected to refuse connections.
        let mut cfg = CatalogConfig::new("k").with_api_base("http://127.0.0.1:9");
        cfg.timeout_secs = Some(2);

        let svc = HealthService::new(cfg).unwrap();
        let status = svc.check().await;

        assert!(!status.ok);
        assert_eq!(status.endpoint, "http://127.0.0.1:9");
        assert!(status.message.contains("[Catalog Service]"));
    }
}
