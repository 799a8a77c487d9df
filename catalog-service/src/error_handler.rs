//! Unified error handling for `catalog-service`.
//!
//! This module exposes a single top-level error type [`CatalogError`] for the whole
//! library, and groups config errors in a nested enum ([`ConfigError`]). Failures of the
//! shared env helpers in [`movie_types::env`] convert into it with `?`.
//!
//! All messages include the suffix `[Catalog Service]` to simplify attribution in logs.

use movie_types::EnvError;
use reqwest::StatusCode;
use thiserror::Error;

/* ------------------------------------------------------------------------- */
/* Public result alias                                                       */
/* ------------------------------------------------------------------------- */

/// Unified result alias for the entire crate.
pub type Result<T> = std::result::Result<T, CatalogError>;

/* ------------------------------------------------------------------------- */
/* Top-level error                                                           */
/* ------------------------------------------------------------------------- */

/// Top-level error for the `catalog-service` crate.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Configuration/validation errors (startup/readiness).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Underlying HTTP transport error (e.g., `reqwest::Error`).
    #[error("[Catalog Service] transport error: {0}")]
    HttpTransport(#[from] reqwest::Error),

    /// Upstream returned a non-successful HTTP status.
    #[error("[Catalog Service] HTTP {status} from {url}: {snippet}")]
    HttpStatus {
        /// Numeric HTTP status code.
        status: StatusCode,
        /// Request URL with credentials redacted.
        url: String,
        /// Short snippet of the response body (trimmed).
        snippet: String,
    },

    /// Response payload could not be decoded as expected.
    #[error("[Catalog Service] decode error: {0}")]
    Decode(String),
}

/* ------------------------------------------------------------------------- */
/* Config errors                                                             */
/* ------------------------------------------------------------------------- */

/// Error enum for environment/config-driven setup.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable is missing or empty.
    #[error("[Catalog Service] missing required environment variable: {0}")]
    MissingVar(&'static str),

    /// A number failed to parse (like timeouts).
    #[error("[Catalog Service] invalid number in {var}: {reason}")]
    InvalidNumber {
        /// Variable name (e.g., `TMDB_TIMEOUT_SECS`).
        var: &'static str,
        /// Human-readable reason (e.g., `expected u64`).
        reason: &'static str,
    },

    /// Value had the wrong format (e.g., invalid URL).
    #[error("[Catalog Service] invalid format in {var}: {reason}")]
    InvalidFormat {
        /// Variable name (e.g., `TMDB_API_BASE`).
        var: &'static str,
        /// Explanation (e.g., `must start with http:// or https://`).
        reason: &'static str,
    },
}

/// Trims a response body to a short single-line snippet for logs and errors.
pub fn make_snippet(text: &str) -> String {
    const MAX: usize = 240;
    let one_line = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if one_line.chars().count() > MAX {
        let mut s: String = one_line.chars().take(MAX).collect();
        s.push('…');
        s
    } else {
        one_line
    }
}

/* ------------------------------------------------------------------------- */
/* Env helpers                                                               */
/* ------------------------------------------------------------------------- */

impl From<EnvError> for ConfigError {
    fn from(err: EnvError) -> Self {
        match err {
            EnvError::MissingVar(var) => ConfigError::MissingVar(var),
            EnvError::InvalidNumber { var, reason } => ConfigError::InvalidNumber { var, reason },
            EnvError::InvalidFormat { var, reason } => ConfigError::InvalidFormat { var, reason },
        }
    }
}

impl From<EnvError> for CatalogError {
    fn from(err: EnvError) -> Self {
        CatalogError::Config(err.into())
    }
}
