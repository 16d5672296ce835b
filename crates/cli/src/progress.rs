//! Spinners for requests in flight

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// A spinner that erases itself when dropped
pub struct Spinner(ProgressBar);

impl Spinner {
    /// Start a spinner for a request of unknown duration
    ///
    /// A disabled spinner draws nothing, so JSON output stays clean.
    #[must_use]
    pub fn start(message: &str, enabled: bool) -> Self {
        if !enabled {
            return Self(ProgressBar::hidden());
        }

        let pb = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        pb.set_style(style);
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(80));
        Self(pb)
    }

    /// Whether anything is drawn
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.0.is_hidden()
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.0.finish_and_clear();
    }
}
