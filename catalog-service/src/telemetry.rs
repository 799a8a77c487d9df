//! Log output for catalog adapter events.
//!
//! The adapter's events get their own fmt layer with UTC timestamps, source
//! locations and the duration of every `#[instrument]`ed call, filtered by
//! target so the binary's general layer can skip them. The verbosity is set
//! with `CATALOG_LOG` (`trace`, `debug`, `info`, `warn`, `error`, `off`) and
//! does not depend on `RUST_LOG`.

use std::io::{self, IsTerminal};

use chrono::{SecondsFormat, Utc};
use movie_types::env::opt_env;
use tracing::Metadata;
use tracing_subscriber::{
    Layer,
    filter::{LevelFilter, Targets},
    fmt::{self, format::FmtSpan, format::Writer},
    registry::LookupSpan,
};

/// Target (crate name) of every event emitted by the adapter.
pub const CATALOG_TARGET: &str = "catalog_service";

/// Whether an event or span comes from the catalog adapter.
pub fn is_catalog(meta: &Metadata<'_>) -> bool {
    meta.target().starts_with(CATALOG_TARGET)
}

/// Builder for the catalog log layer.
#[derive(Debug, Clone)]
pub struct CatalogLogs {
    level: LevelFilter,
    span_timings: bool,
    ansi: bool,
}

impl Default for CatalogLogs {
    fn default() -> Self {
        Self {
            level: LevelFilter::DEBUG,
            span_timings: true,
            ansi: io::stdout().is_terminal(),
        }
    }
}

impl CatalogLogs {
    /// Defaults, with the level taken from `CATALOG_LOG` when it parses.
    pub fn from_env() -> Self {
        let logs = Self::default();
        match opt_env("CATALOG_LOG").and_then(|v| v.trim().parse::<LevelFilter>().ok()) {
            Some(level) => logs.level(level),
            None => logs,
        }
    }

    pub fn level(mut self, level: impl Into<LevelFilter>) -> Self {
        self.level = level.into();
        self
    }

    /// Log a line with the elapsed time whenever an instrumented call returns.
    pub fn span_timings(mut self, on: bool) -> Self {
        self.span_timings = on;
        self
    }

    /// Target filter passing adapter events at the configured level.
    pub fn targets(&self) -> Targets {
        Targets::new().with_target(CATALOG_TARGET, self.level)
    }

    /// Builds the fmt layer. Events from other crates never reach it.
    pub fn into_layer<S>(self) -> impl Layer<S> + Send + Sync
    where
        S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    {
        let span_events = if self.span_timings {
            FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };
        let targets = self.targets();

        fmt::layer()
            .compact()
            .with_timer(rfc3339_utc as fn(&mut Writer<'_>) -> std::fmt::Result)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(self.ansi)
            .with_span_events(span_events)
            .with_filter(targets)
    }
}

fn rfc3339_utc(w: &mut Writer<'_>) -> std::fmt::Result {
    w.write_str(&timestamp())
}

/// Current UTC time at second precision, e.g. `2025-09-12T10:20:30Z`.
fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}
