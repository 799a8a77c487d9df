use std::sync::Arc;

use axum::{Json, extract::State};
use movie_types::Movie;

use crate::core::app_state::AppState;

/// Handler: GET /movies: every row in insertion order.
pub async fn list_movies_route(State(state): State<Arc<AppState>>) -> Json<Vec<Movie>> {
    Json(state.movies.list().await)
}
