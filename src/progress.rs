//! Progress display for long-running commands

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Spinner shown while a feed search or download is in flight
pub struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    /// Start a spinner with `message`
    pub fn start(message: impl Into<String>) -> Self {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            bar.set_style(style);
        }
        bar.set_message(message.into());
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    pub fn set_message(&self, message: impl Into<String>) {
        self.bar.set_message(message.into());
    }

    /// Stop and erase the spinner
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
