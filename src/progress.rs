//! # Status Line Module
//!
//! Terminal rendering of the pipeline's status snapshots: a spinner whose
//! message mirrors whatever the state publishes.

use crate::state::StatusSnapshot;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Flatten a multi-line status text to a single terminal line.
pub fn flatten_status(text: &str) -> String {
    text.replace('\n', " ")
}

/// Spinner-backed status line for the CLI
pub struct StatusLine {
    bar: ProgressBar,
}

impl StatusLine {
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();

        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap(),
        );
        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// Mirror a snapshot onto the line
    pub fn render(&self, snapshot: &StatusSnapshot) {
        self.bar.set_message(flatten_status(&snapshot.status_text));
    }

    /// Stop the spinner with a final message
    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(flatten_status(message));
    }
}

impl Default for StatusLine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_status() {
        assert_eq!(flatten_status("Saved 45%\n→ Photos"), "Saved 45% → Photos");
        assert_eq!(flatten_status("Drop files"), "Drop files");
    }
}
