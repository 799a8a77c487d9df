//! Environment variable helpers shared by the config loaders.
//!
//! Each crate keeps its own `ConfigError` and converts from [`EnvError`], so
//! messages still carry the crate's own attribution.

use thiserror::Error;

/// Failure while reading or validating an environment variable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvError {
    /// Required variable is missing or empty.
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),

    /// A number failed to parse.
    #[error("invalid number in {var}: {reason}")]
    InvalidNumber {
        var: &'static str,
        reason: &'static str,
    },

    /// Value had the wrong format.
    #[error("invalid format in {var}: {reason}")]
    InvalidFormat {
        var: &'static str,
        reason: &'static str,
    },
}

/// Reads an optional variable; empty and whitespace-only values count as unset.
pub fn opt_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Reads a required, non-empty variable.
pub fn must_env(name: &'static str) -> Result<String, EnvError> {
    opt_env(name).ok_or(EnvError::MissingVar(name))
}

/// Reads an optional `u64` (`Ok(None)` when unset or empty).
pub fn opt_env_u64(name: &'static str) -> Result<Option<u64>, EnvError> {
    opt_env(name).map(|v| parse_u64(name, &v)).transpose()
}

/// Parses the value of `var` as a `u64`, ignoring surrounding whitespace.
pub fn parse_u64(var: &'static str, value: &str) -> Result<u64, EnvError> {
    value.trim().parse().map_err(|_| EnvError::InvalidNumber {
        var,
        reason: "expected u64",
    })
}

/// Checks that an endpoint starts with `http://` or `https://`.
pub fn validate_http_endpoint(var: &'static str, value: &str) -> Result<(), EnvError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(EnvError::InvalidFormat {
            var,
            reason: "must start with http:// or https://",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_variable_is_missing() {
        let name = "MOVIE_TYPES_ENV_NEVER_SET";
        assert_eq!(opt_env(name), None);
        assert_eq!(must_env(name), Err(EnvError::MissingVar(name)));
        assert_eq!(opt_env_u64(name), Ok(None));
    }

    #[test]
    fn numbers_are_trimmed_and_checked() {
        assert_eq!(parse_u64("SEARCH_DEBOUNCE_MS", " 250 "), Ok(250));
        assert_eq!(
            parse_u64("SEARCH_DEBOUNCE_MS", "-1"),
            Err(EnvError::InvalidNumber {
                var: "SEARCH_DEBOUNCE_MS",
                reason: "expected u64"
            })
        );
    }

    #[test]
    fn endpoint_scheme_is_checked() {
        assert!(validate_http_endpoint("TMDB_API_BASE", "https://api.themoviedb.org/3").is_ok());
        assert!(validate_http_endpoint("MOVIE_PROXY_URL", "http://localhost:8080").is_ok());
        let err = validate_http_endpoint("MOVIE_PROXY_URL", "localhost:8080").unwrap_err();
        assert!(matches!(err, EnvError::InvalidFormat { var: "MOVIE_PROXY_URL", .. }));
    }
}
