//! POST /search-movies: proxies a free-text query to the movie catalog.

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::HeaderMap,
};
use movie_types::Movie;
use tracing::{debug, error};

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    middleware_layer::request_id::request_id,
    routes::search_movies::search_movies_request::SearchMoviesRequest,
};

/// Handler: POST /search-movies
///
/// Returns a JSON array of movies (possibly empty). A blank query returns an
/// empty array without calling the catalog.
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8080/search-movies \
///   -H 'content-type: application/json' \
///   -d '{"query":"batman"}'
/// ```
pub async fn search_movies_route(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<SearchMoviesRequest>, JsonRejection>,
) -> AppResult<Json<Vec<Movie>>> {
    let Json(p) = payload?;
    let request_id = request_id(&headers);
    let query = p.query.trim();

    if query.is_empty() {
        debug!(request_id = %request_id, "search_movies_route: blank query");
        return Ok(Json(Vec::new()));
    }

    let catalog = state.catalog.as_ref().ok_or(AppError::CatalogNotConfigured)?;

    debug!(request_id = %request_id, query = %query, "search_movies_route: start");

    match catalog.search(query).await {
        Ok(movies) => {
            debug!(
                request_id = %request_id,
                hits = movies.len(),
                "search_movies_route: success"
            );
            Ok(Json(movies))
        }
        Err(err) => {
            error!(
                request_id = %request_id,
                error = %err,
                "search_movies_route: catalog search failed"
            );
            Err(err.into())
        }
    }
}
