//! Runtime configuration loaded from environment variables.
//!
//! - `MOVIE_PROXY_URL`     = base URL of the search proxy (mandatory)
//! - `MOVIE_PROXY_KEY`     = credential sent as bearer token and `apikey` (optional)
//! - `MOVIE_CHANGES_URL`   = live change stream (default `{MOVIE_PROXY_URL}/movies/changes`)
//! - `SEARCH_DEBOUNCE_MS`  = query settle delay (default 500)
//! - `PROXY_TIMEOUT_SECS`  = per-request timeout (default 15)

use std::time::Duration;

use movie_types::env::{must_env, opt_env, opt_env_u64, validate_http_endpoint};

use crate::error::ConfigError;

pub const DEFAULT_DEBOUNCE_MS: u64 = 500;
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Base URL of the search proxy, without trailing slash.
    pub proxy_url: String,
    pub api_key: Option<String>,
    /// Full URL of the server-sent change stream.
    pub changes_url: String,
    pub debounce: Duration,
    pub timeout: Duration,
}

impl PipelineConfig {
    /// Config with default knobs for the given proxy base URL.
    pub fn new(proxy_url: impl Into<String>) -> Self {
        let proxy_url = proxy_url.into().trim_end_matches('/').to_string();
        Self {
            changes_url: format!("{proxy_url}/movies/changes"),
            proxy_url,
            api_key: None,
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let proxy_url = must_env("MOVIE_PROXY_URL")?;
        validate_http_endpoint("MOVIE_PROXY_URL", &proxy_url)?;

        let mut cfg = Self::new(proxy_url);
        cfg.api_key = opt_env("MOVIE_PROXY_KEY");

        if let Some(url) = opt_env("MOVIE_CHANGES_URL") {
            validate_http_endpoint("MOVIE_CHANGES_URL", &url)?;
            cfg.changes_url = url;
        }
        if let Some(ms) = opt_env_u64("SEARCH_DEBOUNCE_MS")? {
            cfg.debounce = Duration::from_millis(ms);
        }
        if let Some(secs) = opt_env_u64("PROXY_TIMEOUT_SECS")? {
            cfg.timeout = Duration::from_secs(secs);
        }

        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_derive_changes_url_from_proxy() {
        let cfg = PipelineConfig::new("http://localhost:8080/");
        assert_eq!(cfg.proxy_url, "http://localhost:8080");
        assert_eq!(cfg.changes_url, "http://localhost:8080/movies/changes");
        assert_eq!(cfg.debounce, Duration::from_millis(500));
    }

    #[test]
    fn env_errors_map_to_pipeline_config_errors() {
        let err: ConfigError = validate_http_endpoint("MOVIE_PROXY_URL", "localhost:8080")
            .unwrap_err()
            .into();
        assert!(matches!(err, ConfigError::InvalidFormat { var: "MOVIE_PROXY_URL", .. }));

        let err: ConfigError = must_env("MOVIE_PROXY_URL_NEVER_SET").unwrap_err().into();
        assert_eq!(
            err.to_string(),
            "missing required environment variable: MOVIE_PROXY_URL_NEVER_SET"
        );
    }
}
