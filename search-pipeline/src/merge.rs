//! Upsert-merge of live change events into the displayed collection.

use movie_types::{ChangeEvent, Movie};

/// What an upsert did to the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// An entry with the same id was replaced at this position.
    Updated(usize),
    /// No entry had the id; the record was appended.
    Appended,
}

/// Replaces the entry with the same id in place, or appends.
///
/// Applying the same record twice leaves the collection as applying it once,
/// and ids stay unique as long as they were unique before.
pub fn upsert_movie(movies: &mut Vec<Movie>, movie: Movie) -> MergeOutcome {
    match movies.iter().position(|m| m.id == movie.id) {
        Some(idx) => {
            movies[idx] = movie;
            MergeOutcome::Updated(idx)
        }
        None => {
            movies.push(movie);
            MergeOutcome::Appended
        }
    }
}

/// Folds one change event into the collection.
pub fn apply_change(movies: &mut Vec<Movie>, event: ChangeEvent) -> MergeOutcome {
    upsert_movie(movies, event.new)
}

/// Builds a collection from a response payload, collapsing repeated ids.
///
/// Later duplicates overwrite the earlier entry at its original position.
pub fn dedup_by_id(payload: Vec<Movie>) -> Vec<Movie> {
    let mut out = Vec::with_capacity(payload.len());
    for movie in payload {
        upsert_movie(&mut out, movie);
    }
    out
}
