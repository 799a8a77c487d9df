use catalog_service::{CatalogConfig, CatalogError, HealthService, TmdbService};
use thiserror::Error;
use tracing::{info, warn};

use crate::core::movie_table::MovieTable;

/// Startup configuration problems for the HTTP layer.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("catalog configuration is invalid: {0}")]
    Catalog(#[from] CatalogError),
}

/// Shared state for all HTTP handlers.
pub struct AppState {
    /// Catalog adapter; `None` when `TMDB_API_KEY` is not configured, in which
    /// case searches fail with a 500 instead of the server refusing to boot.
    pub catalog: Option<TmdbService>,
    /// Health check for the same catalog config.
    pub catalog_health: Option<HealthService>,
    /// Backing movie table and its change channel.
    pub movies: MovieTable,
    /// Allowed CORS origins (`*` alone means any).
    pub cors_origins: Vec<String>,
}

impl AppState {
    pub fn new(catalog: Option<(TmdbService, HealthService)>, cors_origins: Vec<String>) -> Self {
        let (catalog, catalog_health) = match catalog {
            Some((svc, health)) => (Some(svc), Some(health)),
            None => (None, None),
        };
        Self {
            catalog,
            catalog_health,
            movies: MovieTable::default(),
            cors_origins,
        }
    }

    /// Load shared state from environment variables.
    ///
    /// - `TMDB_*` – see [`CatalogConfig::from_env`]; a missing key is tolerated
    /// - `CORS_ALLOWED_ORIGINS` – comma separated, defaults to `*`
    pub fn from_env() -> Result<Self, ConfigError> {
        let catalog = match CatalogConfig::from_env() {
            Ok(cfg) => {
                info!(endpoint = %cfg.api_base, "catalog configured");
                Some((TmdbService::new(cfg.clone())?, HealthService::new(cfg)?))
            }
            Err(CatalogError::Config(catalog_service::ConfigError::MissingVar(var))) => {
                warn!(%var, "catalog not configured; searches will fail until it is set");
                None
            }
            Err(err) => return Err(err.into()),
        };

        let cors_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(String::from)
            .collect();

        Ok(Self::new(catalog, cors_origins))
    }
}
