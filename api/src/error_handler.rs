use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use catalog_service::CatalogError;
use serde::Serialize;
use thiserror::Error;

use crate::core::app_state::ConfigError;

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error("missing required environment variable: {0}")]
    MissingEnv(&'static str),

    #[error(transparent)]
    Config(#[from] ConfigError),

    // --- IO / network / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request / routing ---
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("movie catalog is not configured")]
    CatalogNotConfigured,

    /// Rich HTTP error mapped from lower layers with specific status & code.
    #[error("{message}")]
    Http {
        status: StatusCode,
        code: &'static str,
        message: String,
    },
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            // 4xx
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,

            // custom mapped
            AppError::Http { status, .. } => *status,

            // 5xx
            AppError::MissingEnv(_) | AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::CatalogNotConfigured => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Bind(_) | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::MissingEnv(_) => "MISSING_ENV",
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Bind(_) => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::CatalogNotConfigured => "CATALOG_NOT_CONFIGURED",
            AppError::Http { code, .. } => *code,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.error_code(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(err: axum::extract::rejection::JsonRejection) -> Self {
        AppError::BadRequest(err.body_text())
    }
}

/// Convert catalog failures to `AppError::Http` with a precise status & code.
impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Config(e) => AppError::Http {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                code: "CATALOG_CONFIG_ERROR",
                message: e.to_string(),
            },
            CatalogError::HttpTransport(e) if e.is_timeout() => AppError::Http {
                status: StatusCode::GATEWAY_TIMEOUT,
                code: "CATALOG_TIMEOUT",
                message: "The movie catalog did not answer in time.".into(),
            },
            CatalogError::HttpStatus { status, .. } if status.as_u16() == 401 => AppError::Http {
                status: StatusCode::BAD_GATEWAY,
                code: "CATALOG_UNAUTHORIZED",
                message: "The movie catalog rejected the configured API key.".into(),
            },
            other => AppError::Http {
                status: StatusCode::BAD_GATEWAY,
                code: "CATALOG_ERROR",
                message: format!("Movie catalog request failed: {other}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use catalog_service::ConfigError as CatalogConfigError;

    use super::*;

    fn upstream_status(status: StatusCode) -> CatalogError {
        CatalogError::HttpStatus {
            status,
            url: "http://catalog.test/search/movie".into(),
            snippet: "nope".into(),
        }
    }

    fn parts(err: AppError) -> (StatusCode, &'static str, String) {
        (err.status_code(), err.error_code(), err.to_string())
    }

    #[test]
    fn unauthorized_catalog_is_a_bad_gateway() {
        let (status, code, message) = parts(upstream_status(StatusCode::UNAUTHORIZED).into());
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(code, "CATALOG_UNAUTHORIZED");
        assert!(message.contains("API key"));
    }

    #[test]
    fn other_upstream_statuses_are_catalog_errors() {
        for upstream in [StatusCode::INTERNAL_SERVER_ERROR, StatusCode::NOT_FOUND] {
            let (status, code, message) = parts(upstream_status(upstream).into());
            assert_eq!(status, StatusCode::BAD_GATEWAY);
            assert_eq!(code, "CATALOG_ERROR");
            assert!(message.contains(upstream.as_str()));
            assert!(message.contains("http://catalog.test/search/movie"));
        }
    }

    #[test]
    fn catalog_config_errors_are_server_errors() {
        let err = CatalogError::Config(CatalogConfigError::MissingVar("TMDB_API_KEY"));
        let (status, code, message) = parts(err.into());
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(code, "CATALOG_CONFIG_ERROR");
        assert!(message.contains("TMDB_API_KEY"));
    }

    #[test]
    fn bad_request_keeps_its_status() {
        let (status, code, _) = parts(AppError::BadRequest("missing field".into()));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, "BAD_REQUEST");
    }
}
