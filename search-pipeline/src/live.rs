//! Live change subscriptions.
//!
//! A [`ChangeFeed`] forwards row-change events into a sink channel until the
//! returned [`Subscription`] is cancelled or dropped.

use movie_types::ChangeEvent;
use tokio::{
    sync::{
        broadcast::{self, error::RecvError},
        mpsc,
    },
    task::JoinHandle,
};
use tracing::{debug, warn};

use crate::error::PipelineResult;

/// Source of movie-table change events.
pub trait ChangeFeed: Send + Sync + 'static {
    /// Starts delivering events into `sink`, in arrival order.
    fn subscribe(&self, sink: mpsc::Sender<ChangeEvent>) -> PipelineResult<Subscription>;
}

/// Handle to an active subscription. Dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription {
    task: Option<JoinHandle<()>>,
}

impl Subscription {
    pub fn new(task: JoinHandle<()>) -> Self {
        Self { task: Some(task) }
    }

    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stops delivery; no event is forwarded after this returns.
    pub fn unsubscribe(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("change subscription cancelled");
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.stop();
    }
}

/// In-process feed backed by a tokio broadcast channel.
#[derive(Debug, Clone)]
pub struct BroadcastChangeFeed {
    tx: broadcast::Sender<ChangeEvent>,
}

impl BroadcastChangeFeed {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Wraps an existing channel, e.g. one owned by a movie table.
    pub fn from_sender(tx: broadcast::Sender<ChangeEvent>) -> Self {
        Self { tx }
    }

    /// Publishes an event; returns how many subscribers received it.
    pub fn publish(&self, event: ChangeEvent) -> usize {
        self.tx.send(event).unwrap_or(0)
    }
}

impl ChangeFeed for BroadcastChangeFeed {
    fn subscribe(&self, sink: mpsc::Sender<ChangeEvent>) -> PipelineResult<Subscription> {
        let mut rx = self.tx.subscribe();
        let task = tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) => {
                        if sink.send(event).await.is_err() {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "change feed lagged; events dropped");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });
        Ok(Subscription::new(task))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use movie_types::{ChangeKind, Movie};

    use super::*;

    fn event(id: i64) -> ChangeEvent {
        ChangeEvent::new(ChangeKind::Insert, Movie::new(id, "x"))
    }

    #[tokio::test]
    async fn forwards_events_in_order() {
        let feed = BroadcastChangeFeed::new(16);
        let (tx, mut rx) = mpsc::channel(16);
        let sub = feed.subscribe(tx).unwrap();

        for id in 1..=3 {
            feed.publish(event(id));
        }

        for id in 1..=3 {
            assert_eq!(rx.recv().await.map(|e| e.new.id), Some(id));
        }
        assert!(sub.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn nothing_is_delivered_after_unsubscribe() {
        let feed = BroadcastChangeFeed::new(16);
        let (tx, mut rx) = mpsc::channel(16);
        let sub = feed.subscribe(tx).unwrap();

        sub.unsubscribe();
        feed.publish(event(1));

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(rx.recv().await, None);
    }
}
