//! Terminal rendering of the pipeline view and toasts.

use std::fmt;

use colored::Colorize;
use search_pipeline::{
    MovieCard, MovieDetail, Notification, NotificationVariant, Notifier, PipelineView, Screen,
    SearchPhase,
};

/// Parts of the view that change what is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    screen: Screen,
    detail: Option<MovieDetail>,
    failed: bool,
}

impl Frame {
    pub fn from_view(view: &PipelineView) -> Self {
        Self {
            screen: Screen::from_view(view),
            detail: MovieDetail::from_view(view),
            failed: view.phase == SearchPhase::Error,
        }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.screen {
            Screen::Loading => writeln!(f, "{}", "Searching…".dimmed())?,
            Screen::Grid(cards) if cards.is_empty() => writeln!(f, "{}", "No movies.".dimmed())?,
            Screen::Grid(cards) => {
                for card in cards {
                    write!(f, "{}", CardLine(card))?;
                }
            }
        }
        if self.failed {
            writeln!(f, "{}", "(showing previous results)".dimmed())?;
        }
        if let Some(detail) = &self.detail {
            write!(f, "{}", DetailView(detail))?;
        }
        Ok(())
    }
}

struct CardLine<'a>(&'a MovieCard);

impl fmt::Display for CardLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = self.0;
        writeln!(
            f,
            "{:>8}  {} ({})  {}",
            format!("#{}", c.id).dimmed(),
            c.title.bold(),
            c.year,
            c.rating_label().yellow()
        )
    }
}

struct DetailView<'a>(&'a MovieDetail);

impl fmt::Display for DetailView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = self.0;
        writeln!(f, "{}", "─".repeat(40).dimmed())?;
        writeln!(f, "{}", d.title.bold().underline())?;
        writeln!(f, "{} {}", "Poster:".cyan(), d.poster)?;
        writeln!(f, "{} {}", "Plot:".cyan(), d.plot)?;
        writeln!(f, "{} {}", "Director:".cyan(), d.director)?;
        writeln!(f, "{} {}", "Cast:".cyan(), d.cast_line())?;
        writeln!(f, "{}", "Write a review with `:review <text>`, `:close` to go back.".dimmed())
    }
}

/// Prints notifications as colored toasts on stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToastNotifier;

impl Notifier for ToastNotifier {
    fn notify(&self, n: Notification) {
        println!("{}", toast_line(&n));
    }
}

fn toast_line(n: &Notification) -> String {
    let title = match n.variant {
        NotificationVariant::Default => n.title.green().bold(),
        NotificationVariant::Destructive => n.title.red().bold(),
    };
    match &n.description {
        Some(description) => format!("[{title}] {description}"),
        None => format!("[{title}]"),
    }
}
