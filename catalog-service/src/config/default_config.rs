//! Catalog config loaded strictly from environment variables.
//!
//! # Environment variables
//!
//! - `TMDB_API_KEY`      = API key (mandatory)
//! - `TMDB_API_BASE`     = REST base (optional, defaults to the public API)
//! - `TMDB_IMAGE_BASE`   = poster prefix (optional)
//! - `TMDB_TIMEOUT_SECS` = request timeout (optional, u64)

use movie_types::env::{must_env, opt_env, opt_env_u64, validate_http_endpoint};

use crate::{
    config::catalog_config::{CatalogConfig, DEFAULT_TIMEOUT_SECS},
    error_handler::Result,
};

impl CatalogConfig {
    /// Reads the catalog config from the process environment.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingVar`](crate::ConfigError::MissingVar) if `TMDB_API_KEY` is unset
    /// - [`ConfigError::InvalidFormat`](crate::ConfigError::InvalidFormat) for non-http(s) bases
    /// - [`ConfigError::InvalidNumber`](crate::ConfigError::InvalidNumber) for a bad timeout
    pub fn from_env() -> Result<Self> {
        let mut cfg = CatalogConfig::new(must_env("TMDB_API_KEY")?);

        if let Some(base) = opt_env("TMDB_API_BASE") {
            validate_http_endpoint("TMDB_API_BASE", &base)?;
            cfg = cfg.with_api_base(base);
        }
        if let Some(base) = opt_env("TMDB_IMAGE_BASE") {
            validate_http_endpoint("TMDB_IMAGE_BASE", &base)?;
            cfg = cfg.with_image_base(base);
        }
        cfg.timeout_secs = Some(opt_env_u64("TMDB_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS));

        Ok(cfg)
    }
}
