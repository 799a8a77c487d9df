//! GET /movies/changes: live change stream over server-sent events.
//!
//! Each frame is `event: movies-changes` with a JSON [`ChangeEvent`] as data.

use std::{convert::Infallible, sync::Arc};

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::{Stream, stream};
use movie_types::{CHANGES_EVENT, ChangeEvent};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, warn};

use crate::core::app_state::AppState;

/// Handler: GET /movies/changes
pub async fn movie_changes_route(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    debug!("movie_changes_route: subscriber connected");
    Sse::new(change_stream(state.movies.subscribe())).keep_alive(KeepAlive::default())
}

fn change_stream(
    rx: broadcast::Receiver<ChangeEvent>,
) -> impl Stream<Item = Result<Event, Infallible>> {
    stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(change) => match Event::default().event(CHANGES_EVENT).json_data(&change) {
                    Ok(event) => return Some((Ok::<_, Infallible>(event), rx)),
                    Err(err) => warn!(error = %err, "failed to encode change event"),
                },
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "change subscriber lagged; events dropped");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    })
}
