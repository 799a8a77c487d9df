//! Row-change notifications published for the movie table.

use serde::{Deserialize, Serialize};

use crate::movie::{MissingId, Movie, RawMovie};

/// Name of the backing table every change event is scoped to.
pub const MOVIES_TABLE: &str = "movies";

/// Server-sent event name carrying serialized [`ChangeEvent`]s.
pub const CHANGES_EVENT: &str = "movies-changes";

/// Kind of row change. Deletes are not modeled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeKind {
    Insert,
    Update,
}

/// A row inserted or updated in the movie table, carrying the new snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawChangeEvent")]
pub struct ChangeEvent {
    #[serde(rename = "eventType")]
    pub event_type: ChangeKind,
    pub table: String,
    /// New-record snapshot; its `id` is the merge key.
    pub new: Movie,
}

impl ChangeEvent {
    pub fn new(event_type: ChangeKind, movie: Movie) -> Self {
        Self {
            event_type,
            table: MOVIES_TABLE.to_string(),
            new: movie,
        }
    }
}

/// Wire form of [`ChangeEvent`], coerced at the boundary.
#[derive(Debug, Clone, Deserialize)]
pub struct RawChangeEvent {
    #[serde(rename = "eventType", alias = "event_type")]
    pub event_type: ChangeKind,
    #[serde(default)]
    pub table: Option<String>,
    #[serde(alias = "record")]
    pub new: RawMovie,
}

impl TryFrom<RawChangeEvent> for ChangeEvent {
    type Error = MissingId;

    fn try_from(raw: RawChangeEvent) -> Result<Self, Self::Error> {
        Ok(Self {
            event_type: raw.event_type,
            table: raw.table.unwrap_or_else(|| MOVIES_TABLE.to_string()),
            new: Movie::try_from(raw.new)?,
        })
    }
}
