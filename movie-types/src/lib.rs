//! Shared movie record shape.
//!
//! Used by the catalog adapter (producer), the HTTP layer (transport, movie
//! table) and the search pipeline (consumer), plus the env helpers their
//! config loaders share.

pub mod change_event;
pub mod env;
pub mod movie;

pub use change_event::{CHANGES_EVENT, ChangeEvent, ChangeKind, MOVIES_TABLE, RawChangeEvent};
pub use env::EnvError;
pub use movie::{MissingId, Movie, NOT_AVAILABLE, PLACEHOLDER_POSTER, RawMovie};
