use std::{env, sync::Arc};

pub mod core;
pub mod error_handler;
mod middleware_layer;
mod routes;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::{
    core::{app_state::AppState, cors::build_cors_layer},
    error_handler::AppError,
    middleware_layer::request_id::ensure_request_id,
    routes::{
        health_route::health_route,
        movies::{
            list_movies_route::list_movies_route, movie_changes_route::movie_changes_route,
            upsert_movie_route::upsert_movie_route,
        },
        search_movies::search_movies_route::search_movies_route,
    },
};

/// Boots the HTTP server from environment configuration.
///
/// - `API_ADDRESS` – listen address, e.g. `0.0.0.0:8080` (required)
pub async fn start() -> Result<(), AppError> {
    let host_url = env::var("API_ADDRESS").map_err(|_| AppError::MissingEnv("API_ADDRESS"))?;
    let state = Arc::new(AppState::from_env()?);

    let app = router(state);

    // Bind to address
    let listener = tokio::net::TcpListener::bind(&host_url)
        .await
        .map_err(AppError::Bind)?;
    info!(address = %host_url, "listening");

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("server stopped");
    Ok(())
}

/// Assembles every route with its middleware stack.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = build_cors_layer(&state.cors_origins);

    Router::new()
        .route("/search-movies", post(search_movies_route))
        .route("/movies", get(list_movies_route).post(upsert_movie_route))
        .route("/movies/changes", get(movie_changes_route))
        .route("/health", get(health_route))
        .layer(middleware::from_fn(ensure_request_id))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Returns a future that resolves when Ctrl+C is pressed
async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
