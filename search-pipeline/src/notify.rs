//! User-visible notifications (toasts).

use tracing::{info, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NotificationVariant {
    #[default]
    Default,
    /// Rendered as an error.
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: Option<String>,
    pub variant: NotificationVariant,
}

impl Notification {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            variant: NotificationVariant::Default,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn destructive(mut self) -> Self {
        self.variant = NotificationVariant::Destructive;
        self
    }

    /// Generic message shown for any failed search dispatch.
    pub fn search_failed() -> Self {
        Self::new("Search failed")
            .with_description("Failed to search movies. Please try again.")
            .destructive()
    }

    pub fn review_empty() -> Self {
        Self::new("Review cannot be empty").destructive()
    }

    pub fn review_submitted() -> Self {
        Self::new("Review submitted!").with_description("Thank you for your feedback.")
    }
}

/// Sink for notifications; the front-end decides how they are shown.
pub trait Notifier: Send + Sync + 'static {
    fn notify(&self, notification: Notification);
}

/// Writes notifications to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, n: Notification) {
        let description = n.description.as_deref().unwrap_or_default();
        match n.variant {
            NotificationVariant::Default => info!(title = %n.title, description, "notification"),
            NotificationVariant::Destructive => warn!(title = %n.title, description, "notification"),
        }
    }
}
