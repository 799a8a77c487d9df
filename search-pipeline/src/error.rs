//! Error hierarchy for the search pipeline.

use movie_types::EnvError;
use thiserror::Error;

/// Convenient alias for pipeline results.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Root error type for pipeline setup and control.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// `start` was called on a pipeline that already started once.
    #[error("pipeline already started; only one live subscription per pipeline is allowed")]
    AlreadyStarted,

    /// The pipeline task has stopped; commands are no longer accepted.
    #[error("pipeline is stopped")]
    Stopped,

    /// Configuration problems (missing proxy URL, bad numbers, etc.).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// HTTP client could not be built.
    #[error("http client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Failure of a single search dispatch.
///
/// All variants are surfaced to the user the same way; the distinction
/// only matters for logs.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Network/transport failure without HTTP status (DNS/connect/reset/timeout).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The proxy answered with a non-2xx status.
    #[error("proxy returned status {status}: {snippet}")]
    HttpStatus {
        status: u16,
        /// Short snippet of the response body.
        snippet: String,
    },

    /// The body was not a JSON array of movie records.
    #[error("malformed search payload: {0}")]
    Decode(String),

    /// The backend panicked while answering.
    #[error("search backend panicked")]
    Panicked,
}

/// Configuration and setup errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable is missing or empty.
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

impl From<EnvError> for ConfigError {
    fn from(err: EnvError) -> Self {
        match err {
            EnvError::MissingVar(var) => ConfigError::MissingVar(var),
            EnvError::InvalidNumber { var, reason } => ConfigError::InvalidNumber { var, reason },
            EnvError::InvalidFormat { var, reason } => ConfigError::InvalidFormat { var, reason },
        }
    }
}
