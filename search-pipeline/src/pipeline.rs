//! Debounced search dispatch with live merge, driven by a single actor task.
//!
//! The actor owns the [`SearchStore`] and is its only writer. It selects over
//! handle commands, settled queries from the debouncer, finished searches and
//! live change events, applying each to the store before looking at the next,
//! and publishes a fresh [`PipelineView`] after every step.
//!
//! Searches run as separate tasks so a slow response never blocks typing or
//! live updates; their results come back tagged with the ticket they were
//! issued for and the store drops the stale ones.

use std::{panic::AssertUnwindSafe, sync::Arc, time::Duration};

use futures::FutureExt;
use movie_types::{ChangeEvent, Movie};
use tokio::{
    sync::{mpsc, watch},
    task::{JoinHandle, JoinSet},
};
use tracing::{debug, info, warn};

use crate::{
    backend::SearchBackend,
    config::PipelineConfig,
    debounce::Debouncer,
    error::{PipelineError, PipelineResult, SearchError},
    live::{ChangeFeed, Subscription},
    notify::{Notification, Notifier},
    proxy_client::ProxyClient,
    sse_feed::SseChangeFeed,
    store::{Completion, Dispatch, PipelineView, SearchStore, SearchTicket},
};

/// Live events buffered between the feed and the actor.
const LIVE_BUFFER: usize = 64;

#[derive(Debug)]
enum Command {
    SetQuery(String),
    Select(i64),
    CloseDetail,
    Shutdown,
}

/// A search pipeline with its injected collaborators.
///
/// [`SearchPipeline::start`] may succeed only once per instance, so at most
/// one live subscription exists per pipeline.
pub struct SearchPipeline<B, F, N> {
    backend: Arc<B>,
    feed: F,
    notifier: Arc<N>,
    debounce: Duration,
    started: bool,
}

impl<N: Notifier> SearchPipeline<ProxyClient, SseChangeFeed, N> {
    /// Pipeline talking to the HTTP proxy and its change stream.
    pub fn from_config(cfg: &PipelineConfig, notifier: N) -> PipelineResult<Self> {
        Ok(Self::new(
            ProxyClient::new(cfg)?,
            SseChangeFeed::new(cfg)?,
            notifier,
            cfg.debounce,
        ))
    }
}

impl<B: SearchBackend, F: ChangeFeed, N: Notifier> SearchPipeline<B, F, N> {
    pub fn new(backend: B, feed: F, notifier: N, debounce: Duration) -> Self {
        Self {
            backend: Arc::new(backend),
            feed,
            notifier: Arc::new(notifier),
            debounce,
            started: false,
        }
    }

    /// Subscribes to live changes and spawns the actor.
    ///
    /// Must be called within a tokio runtime.
    pub fn start(&mut self) -> PipelineResult<PipelineHandle> {
        if self.started {
            return Err(PipelineError::AlreadyStarted);
        }

        let (live_tx, live_rx) = mpsc::channel(LIVE_BUFFER);
        let subscription = self.feed.subscribe(live_tx)?;
        self.started = true;

        let (debouncer, settled_rx) = Debouncer::new(self.debounce);
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (view_tx, view_rx) = watch::channel(PipelineView::default());

        let actor = Actor {
            store: SearchStore::new(),
            backend: Arc::clone(&self.backend),
            notifier: Arc::clone(&self.notifier),
            debouncer,
            subscription,
            in_flight: JoinSet::new(),
            view: view_tx,
        };
        let task = tokio::spawn(actor.run(command_rx, settled_rx, live_rx));
        info!(debounce_ms = self.debounce.as_millis() as u64, "search pipeline started");

        Ok(PipelineHandle {
            commands: command_tx,
            view: view_rx,
            task: Some(task),
        })
    }
}

/// Control surface of a running pipeline. Dropping it stops the pipeline.
#[derive(Debug)]
pub struct PipelineHandle {
    commands: mpsc::UnboundedSender<Command>,
    view: watch::Receiver<PipelineView>,
    task: Option<JoinHandle<()>>,
}

impl PipelineHandle {
    /// Replaces the raw query text. Dispatch happens once the text settles.
    pub fn set_query(&self, query: impl Into<String>) -> PipelineResult<()> {
        self.send(Command::SetQuery(query.into()))
    }

    /// Opens the detail overlay for the displayed movie with `id`.
    pub fn select(&self, id: i64) -> PipelineResult<()> {
        self.send(Command::Select(id))
    }

    pub fn close_detail(&self) -> PipelineResult<()> {
        self.send(Command::CloseDetail)
    }

    /// Latest published snapshot.
    pub fn view(&self) -> PipelineView {
        self.view.borrow().clone()
    }

    /// Receiver notified on every view change.
    pub fn watch(&self) -> watch::Receiver<PipelineView> {
        self.view.clone()
    }

    /// Stops the pipeline and waits for teardown to finish.
    ///
    /// After this returns no search result or live event reaches the view.
    pub async fn shutdown(mut self) -> PipelineResult<()> {
        let _ = self.commands.send(Command::Shutdown);
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                warn!(error = %err, "pipeline task ended abnormally");
            }
        }
        Ok(())
    }

    fn send(&self, command: Command) -> PipelineResult<()> {
        self.commands
            .send(command)
            .map_err(|_| PipelineError::Stopped)
    }
}

impl Drop for PipelineHandle {
    fn drop(&mut self) {
        if self.task.is_some() {
            let _ = self.commands.send(Command::Shutdown);
        }
    }
}

struct Actor<B, N> {
    store: SearchStore,
    backend: Arc<B>,
    notifier: Arc<N>,
    debouncer: Debouncer<String>,
    subscription: Subscription,
    in_flight: JoinSet<(SearchTicket, Result<Vec<Movie>, SearchError>)>,
    view: watch::Sender<PipelineView>,
}

impl<B: SearchBackend, N: Notifier> Actor<B, N> {
    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<Command>,
        mut settled: mpsc::Receiver<String>,
        mut live: mpsc::Receiver<ChangeEvent>,
    ) {
        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(Command::SetQuery(query)) => self.on_query(query),
                    Some(Command::Select(id)) => {
                        if !self.store.select(id) {
                            debug!(id, "select ignored; movie not displayed");
                        }
                    }
                    Some(Command::CloseDetail) => self.store.close_detail(),
                    Some(Command::Shutdown) | None => break,
                },
                Some(query) = settled.recv() => self.on_settled(query),
                Some(joined) = self.in_flight.join_next(), if !self.in_flight.is_empty() => {
                    match joined {
                        Ok((ticket, result)) => self.on_completed(ticket, result),
                        Err(err) => warn!(error = %err, "search task failed to join"),
                    }
                }
                Some(event) = live.recv() => self.on_change(event),
            }
            self.publish();
        }

        drop(live);
        self.teardown();
    }

    fn on_query(&mut self, query: String) {
        self.store.set_query(&query);
        if !self.debouncer.push(query) {
            warn!("debouncer stopped; query change ignored");
        }
    }

    fn on_settled(&mut self, query: String) {
        match self.store.settle(&query) {
            Dispatch::Search(ticket) => {
                debug!(query = %ticket.query(), generation = ticket.generation(), "dispatching search");
                let backend = Arc::clone(&self.backend);
                self.in_flight.spawn(async move {
                    let result = AssertUnwindSafe(backend.search(ticket.query()))
                        .catch_unwind()
                        .await
                        .unwrap_or(Err(SearchError::Panicked));
                    (ticket, result)
                });
            }
            Dispatch::Clear => debug!("query cleared"),
            Dispatch::Unchanged => debug!(query = %query.trim(), "settled on current query"),
        }
    }

    fn on_completed(&mut self, ticket: SearchTicket, result: Result<Vec<Movie>, SearchError>) {
        let error = result.as_ref().err().map(ToString::to_string);
        match self.store.complete(&ticket, result) {
            Completion::Applied { count } => {
                info!(query = %ticket.query(), count, "search results applied");
            }
            Completion::Failed => {
                warn!(query = %ticket.query(), error = error.as_deref().unwrap_or_default(), "search failed");
                self.notifier.notify(Notification::search_failed());
            }
            Completion::Stale => {}
        }
    }

    fn on_change(&mut self, event: ChangeEvent) {
        let id = event.new.id;
        let outcome = self.store.apply_change(event);
        debug!(id, ?outcome, "live change merged");
    }

    fn publish(&self) {
        let next = self.store.view();
        self.view.send_if_modified(|current| {
            if current == next {
                false
            } else {
                *current = next.clone();
                true
            }
        });
    }

    fn teardown(self) {
        self.subscription.unsubscribe();
        self.debouncer.cancel();
        let mut in_flight = self.in_flight;
        in_flight.abort_all();
        info!("search pipeline stopped");
    }
}
