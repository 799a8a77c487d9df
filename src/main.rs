use std::error::Error;

use catalog_service::telemetry::{self, CatalogLogs};
use tracing_subscriber::{
    EnvFilter, Layer,
    filter::{self, FilterExt},
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load environment variables from .env file.
    // A missing .env is fine, the process environment may already be populated.
    if let Err(err) = dotenvy::dotenv() {
        if !err.not_found() {
            return Err(err.into());
        }
    }

    // RUST_LOG drives the general layer; catalog events go only through the
    // catalog layer, whose level comes from CATALOG_LOG.
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=info"));
    let app_filter = env_filter.and(filter::filter_fn(|meta| !telemetry::is_catalog(meta)));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_filter(app_filter))
        .with(CatalogLogs::from_env().into_layer())
        .try_init()?;

    tracing::info!("movie-db backend starting");

    api::start().await?;

    Ok(())
}
