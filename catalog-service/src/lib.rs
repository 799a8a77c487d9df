//! Adapter for the third-party movie catalog.
//!
//! The search proxy calls [`services::tmdb_service::TmdbService::search`] and
//! gets back records already reshaped into [`movie_types::Movie`].

pub mod config;
pub mod error_handler;
pub mod health_service;
pub mod services;
pub mod telemetry;

pub use config::catalog_config::CatalogConfig;
pub use error_handler::{CatalogError, ConfigError, Result};
pub use health_service::{HealthService, HealthStatus};
pub use services::tmdb_service::TmdbService;
