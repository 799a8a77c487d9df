//! View models derived from [`PipelineView`]. No business logic lives here.

use movie_types::Movie;

use crate::{
    notify::{Notification, Notifier},
    store::{PipelineView, SearchPhase},
};

/// Summary card shown in the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieCard {
    pub id: i64,
    pub title: String,
    pub year: String,
    pub poster: String,
    pub rating: f64,
}

impl MovieCard {
    /// Rating rounded to one decimal, e.g. `★ 9.0`.
    pub fn rating_label(&self) -> String {
        format!("★ {:.1}", (self.rating * 10.0).round() / 10.0)
    }
}

impl From<&Movie> for MovieCard {
    fn from(m: &Movie) -> Self {
        Self {
            id: m.id,
            title: m.title.clone(),
            year: m.year.clone(),
            poster: m.poster.clone(),
            rating: m.rating,
        }
    }
}

/// What the main area shows.
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Loading,
    Grid(Vec<MovieCard>),
}

impl Screen {
    pub fn from_view(view: &PipelineView) -> Self {
        match view.phase {
            SearchPhase::Loading => Screen::Loading,
            _ => Screen::Grid(view.movies.iter().map(MovieCard::from).collect()),
        }
    }
}

/// Detail overlay content for the selected movie.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieDetail {
    pub title: String,
    pub poster: String,
    pub plot: String,
    pub director: String,
    pub cast: Vec<String>,
}

impl MovieDetail {
    /// Overlay for the current selection, if the overlay is open.
    pub fn from_view(view: &PipelineView) -> Option<Self> {
        view.selected
            .as_ref()
            .filter(|_| view.detail_open)
            .map(Self::from)
    }

    pub fn cast_line(&self) -> String {
        self.cast.join(", ")
    }
}

impl From<&Movie> for MovieDetail {
    fn from(m: &Movie) -> Self {
        Self {
            title: m.title.clone(),
            poster: m.poster.clone(),
            plot: m.plot.clone(),
            director: m.director.clone(),
            cast: m.cast.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewOutcome {
    Rejected,
    Submitted,
}

/// Free-text review input. Submissions are acknowledged, not stored.
#[derive(Debug, Clone, Default)]
pub struct ReviewForm {
    text: String,
}

impl ReviewForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn submit(&mut self, notifier: &dyn Notifier) -> ReviewOutcome {
        if self.text.trim().is_empty() {
            notifier.notify(Notification::review_empty());
            return ReviewOutcome::Rejected;
        }
        self.text.clear();
        notifier.notify(Notification::review_submitted());
        ReviewOutcome::Submitted
    }
}
