//! POST /movies: inserts or updates a row and notifies live subscribers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::HeaderMap,
};
use movie_types::{ChangeKind, Movie, RawMovie};
use serde::Serialize;
use tracing::info;

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    middleware_layer::request_id::request_id,
};

#[derive(Debug, Serialize)]
pub struct UpsertMovieResponse {
    pub event_type: ChangeKind,
    pub movie: Movie,
}

/// Handler: POST /movies
///
/// The body is coerced like any other wire record; only `id` is required.
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8080/movies \
///   -H 'content-type: application/json' \
///   -d '{"id":2,"title":"The Dark Knight","rating":9.1}'
/// ```
pub async fn upsert_movie_route(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<RawMovie>, JsonRejection>,
) -> AppResult<Json<UpsertMovieResponse>> {
    let Json(raw) = payload?;
    let movie = raw
        .into_movie()
        .ok_or_else(|| AppError::BadRequest("movie record requires an `id`".into()))?;

    let event = state.movies.upsert(movie).await;

    info!(
        request_id = %request_id(&headers),
        id = event.new.id,
        kind = ?event.event_type,
        "upsert_movie_route: row stored"
    );

    Ok(Json(UpsertMovieResponse {
        event_type: event.event_type,
        movie: event.new,
    }))
}
