//! Movie search pipeline.
//!
//! Debounces query edits, dispatches one proxy search per settled query,
//! discards responses for superseded queries and folds live movie-table
//! changes into the displayed collection by id.

pub mod backend;
pub mod config;
pub mod debounce;
pub mod error;
pub mod live;
pub mod merge;
pub mod notify;
pub mod pipeline;
pub mod presentation;
pub mod proxy_client;
pub mod sse_feed;
pub mod store;

pub use backend::SearchBackend;
pub use config::PipelineConfig;
pub use error::{ConfigError, PipelineError, PipelineResult, SearchError};
pub use live::{BroadcastChangeFeed, ChangeFeed, Subscription};
pub use merge::{MergeOutcome, upsert_movie};
pub use notify::{Notification, NotificationVariant, Notifier, TracingNotifier};
pub use pipeline::{PipelineHandle, SearchPipeline};
pub use presentation::{MovieCard, MovieDetail, ReviewForm, ReviewOutcome, Screen};
pub use proxy_client::ProxyClient;
pub use sse_feed::SseChangeFeed;
pub use store::{PipelineView, SearchPhase};
