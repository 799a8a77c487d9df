//! In-memory movie table with a live change channel.
//!
//! Rows keep insertion order and ids stay unique: an upsert replaces the row
//! in place when the id is known and appends otherwise. Every upsert is
//! published to subscribers as a [`ChangeEvent`].

use movie_types::{ChangeEvent, ChangeKind, Movie};
use tokio::sync::{RwLock, broadcast};
use tracing::debug;

/// Default capacity of the change channel per subscriber.
pub const DEFAULT_CHANGE_BUFFER: usize = 256;

pub struct MovieTable {
    rows: RwLock<Vec<Movie>>,
    changes: broadcast::Sender<ChangeEvent>,
}

impl MovieTable {
    pub fn new(change_buffer: usize) -> Self {
        let (changes, _) = broadcast::channel(change_buffer.max(1));
        Self {
            rows: RwLock::new(Vec::new()),
            changes,
        }
    }

    /// Inserts or replaces a row by id and publishes the change.
    pub async fn upsert(&self, movie: Movie) -> ChangeEvent {
        let mut rows = self.rows.write().await;
        let kind = match rows.iter().position(|row| row.id == movie.id) {
            Some(idx) => {
                rows[idx] = movie.clone();
                ChangeKind::Update
            }
            None => {
                rows.push(movie.clone());
                ChangeKind::Insert
            }
        };
        let event = ChangeEvent::new(kind, movie);

        // Published under the write guard so subscribers see writes in order.
        // No subscribers is not an error; the row is stored either way.
        let receivers = self.changes.send(event.clone()).unwrap_or(0);
        drop(rows);

        debug!(
            id = event.new.id,
            kind = ?event.event_type,
            receivers,
            "movie row upserted"
        );

        event
    }

    /// Snapshot of all rows in insertion order.
    pub async fn list(&self) -> Vec<Movie> {
        self.rows.read().await.clone()
    }

    /// Subscribes to changes published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.changes.subscribe()
    }
}

impl Default for MovieTable {
    fn default() -> Self {
        Self::new(DEFAULT_CHANGE_BUFFER)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio::task::JoinSet;

    use super::*;

    #[tokio::test]
    async fn upsert_inserts_then_updates_in_place() {
        let table = MovieTable::default();
        table.upsert(Movie::new(1, "Inception")).await;
        table.upsert(Movie::new(2, "The Dark Knight")).await;

        let mut updated = Movie::new(1, "Inception");
        updated.rating = 8.8;
        let event = table.upsert(updated).await;

        assert_eq!(event.event_type, ChangeKind::Update);
        let rows = table.list().await;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, 1);
        assert_eq!(rows[0].rating, 8.8);
        assert_eq!(rows[1].id, 2);
    }

    #[tokio::test]
    async fn subscribers_see_changes_in_order() {
        let table = MovieTable::default();
        let mut rx = table.subscribe();

        table.upsert(Movie::new(5, "Heat")).await;
        table.upsert(Movie::new(5, "Heat (1995)")).await;

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        assert_eq!(first.event_type, ChangeKind::Insert);
        assert_eq!(second.event_type, ChangeKind::Update);
        assert_eq!(second.new.title, "Heat (1995)");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_upserts_publish_in_write_order() {
        let table = Arc::new(MovieTable::new(1024));
        let mut rx = table.subscribe();

        let mut writers = JoinSet::new();
        for writer in 0..8 {
            let table = table.clone();
            writers.spawn(async move {
                for n in 0..50 {
                    table.upsert(Movie::new(9, format!("take {writer}-{n}"))).await;
                }
            });
        }
        while let Some(joined) = writers.join_next().await {
            joined.unwrap();
        }

        let mut last = None;
        while let Ok(event) = rx.try_recv() {
            last = Some(event);
        }
        let rows = table.list().await;
        assert_eq!(rows.len(), 1);
        assert_eq!(last.unwrap().new, rows[0]);
    }
}
