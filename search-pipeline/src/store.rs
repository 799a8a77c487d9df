//! Pure search state machine.
//!
//! [`SearchStore`] owns query, lifecycle, collection and selection state and
//! decides what each input means; it performs no I/O. The async driver in
//! [`crate::pipeline`] feeds it events one at a time, so every transition
//! runs to completion before the next one starts.
//!
//! Stale responses are recognized by generation: every settle bumps the
//! generation, and a completion whose ticket carries an older generation is
//! discarded.

use movie_types::{ChangeEvent, Movie};
use tracing::debug;

use crate::error::SearchError;
use crate::merge::{self, MergeOutcome};

/// Lifecycle of the most recent search dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchPhase {
    #[default]
    Idle,
    /// Input changed and has not settled yet.
    Debouncing,
    Loading,
    Success,
    Error,
}

impl SearchPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, SearchPhase::Success | SearchPhase::Error)
    }
}

/// Identifies one dispatched search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    generation: u64,
    query: String,
}

impl SearchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn query(&self) -> &str {
        &self.query
    }
}

/// What a settled query asks the driver to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Blank query: the collection was cleared, no request.
    Clear,
    /// Issue exactly one request for this ticket.
    Search(SearchTicket),
    /// Same query as the one already loaded or loading.
    Unchanged,
}

/// How a search response was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Collection replaced with `count` records.
    Applied { count: usize },
    /// Request failed; collection kept.
    Failed,
    /// Response belonged to a superseded query and was dropped.
    Stale,
}

/// Snapshot read by the presentation layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineView {
    /// Raw input text.
    pub query: String,
    /// Last settled input.
    pub settled_query: String,
    pub phase: SearchPhase,
    pub movies: Vec<Movie>,
    /// Copy of the selected record, detached from `movies`.
    pub selected: Option<Movie>,
    pub detail_open: bool,
}

#[derive(Debug, Default)]
pub struct SearchStore {
    view: PipelineView,
    generation: u64,
    /// Phase the last dispatch resolved to, restored when input returns to
    /// the settled query without a new dispatch.
    resolved: SearchPhase,
}

impl SearchStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> &PipelineView {
        &self.view
    }

    /// Records a raw input change.
    pub fn set_query(&mut self, raw: &str) {
        self.view.query = raw.to_string();
        if raw.trim() != self.view.settled_query.trim() {
            self.view.phase = SearchPhase::Debouncing;
        }
    }

    /// Handles a settled query.
    pub fn settle(&mut self, settled: &str) -> Dispatch {
        let query = settled.trim();

        if query.is_empty() {
            self.generation += 1;
            self.view.settled_query = settled.to_string();
            self.view.movies.clear();
            self.view.phase = SearchPhase::Idle;
            self.resolved = SearchPhase::Idle;
            return Dispatch::Clear;
        }

        let same_query = query == self.view.settled_query.trim();
        if same_query && matches!(self.resolved, SearchPhase::Loading | SearchPhase::Success) {
            self.view.phase = self.resolved;
            return Dispatch::Unchanged;
        }

        self.generation += 1;
        self.view.settled_query = settled.to_string();
        self.view.phase = SearchPhase::Loading;
        self.resolved = SearchPhase::Loading;

        Dispatch::Search(SearchTicket {
            generation: self.generation,
            query: query.to_string(),
        })
    }

    /// Applies a search response unless its ticket is stale.
    pub fn complete(
        &mut self,
        ticket: &SearchTicket,
        result: Result<Vec<Movie>, SearchError>,
    ) -> Completion {
        if ticket.generation != self.generation {
            debug!(
                query = %ticket.query,
                generation = ticket.generation,
                current = self.generation,
                "discarding stale search response"
            );
            return Completion::Stale;
        }

        match result {
            Ok(payload) => {
                self.view.movies = merge::dedup_by_id(payload);
                self.view.phase = SearchPhase::Success;
                self.resolved = SearchPhase::Success;
                Completion::Applied {
                    count: self.view.movies.len(),
                }
            }
            Err(_) => {
                self.view.phase = SearchPhase::Error;
                self.resolved = SearchPhase::Error;
                Completion::Failed
            }
        }
    }

    /// Folds a live change event into the collection.
    pub fn apply_change(&mut self, event: ChangeEvent) -> MergeOutcome {
        merge::apply_change(&mut self.view.movies, event)
    }

    /// Opens the detail overlay on a snapshot of the record with `id`.
    pub fn select(&mut self, id: i64) -> bool {
        match self.view.movies.iter().find(|m| m.id == id) {
            Some(movie) => {
                self.view.selected = Some(movie.clone());
                self.view.detail_open = true;
                true
            }
            None => false,
        }
    }

    pub fn close_detail(&mut self) {
        self.view.detail_open = false;
    }
}
