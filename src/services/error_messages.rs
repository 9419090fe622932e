//! Maps lookup failures to user guidance and holds the dismissable banner.

use std::time::{Duration, Instant};

use serde::Serialize;

/// A message for the user, plus whether the API key form should open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Guidance {
    pub message: String,
    pub show_key_input: bool,
}

impl Guidance {
    fn plain(message: &str) -> Self {
        Self {
            message: message.to_string(),
            show_key_input: false,
        }
    }
}

/// Guidance for a failed API-mode lookup, chosen by the error text.
pub fn user_message(error_text: &str) -> Guidance {
    let lower = error_text.to_lowercase();
    if lower.contains("invalid api key") {
        Guidance {
            message: "Your SerpApi Key is invalid. Please enter a valid key.".to_string(),
            show_key_input: true,
        }
    } else if lower.contains("rate limit") || lower.contains("monthly limit") {
        Guidance::plain("SerpApi plan limit reached. Try using Manual Mode.")
    } else if lower.contains("all api proxies failed") {
        Guidance::plain("Could not connect to the lookup service. Please try again later.")
    } else {
        Guidance::plain("Failed to fetch details. Please check the URL or your connection.")
    }
}

/// The latest error message, hidden once its display time has passed.
#[derive(Debug, Clone)]
pub struct ErrorBanner {
    message: Option<(String, Instant)>,
    dismiss_after: Duration,
}

impl ErrorBanner {
    pub fn new(dismiss_after: Duration) -> Self {
        Self {
            message: None,
            dismiss_after,
        }
    }

    /// Shows `message`, replacing any earlier one and restarting the timer.
    pub fn show(&mut self, message: impl Into<String>, now: Instant) {
        self.message = Some((message.into(), now));
    }

    pub fn clear(&mut self) {
        self.message = None;
    }

    /// The visible message at `now`.
    pub fn current(&self, now: Instant) -> Option<&str> {
        match &self.message {
            Some((message, shown_at))
                if now.saturating_duration_since(*shown_at) < self.dismiss_after =>
            {
                Some(message.as_str())
            }
            _ => None,
        }
    }
}
