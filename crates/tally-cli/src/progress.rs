use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::ui;

const SPINNER: &str = "{spinner:.cyan} {msg}";
const COUNTER: &str = "{spinner:.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}";

/// Stderr progress for a running command; silent when the terminal settings
/// turn progress off.
pub struct Progress(Option<ProgressBar>);

impl Progress {
    /// Indeterminate progress for a single meeting.
    #[must_use]
    pub fn spinner(message: &str) -> Self {
        Self::start(ProgressBar::new_spinner(), SPINNER, message)
    }

    /// Counted progress over `total` meetings.
    #[must_use]
    pub fn counter(total: usize, message: &str) -> Self {
        let total = u64::try_from(total).unwrap_or(u64::MAX);
        Self::start(ProgressBar::new(total), COUNTER, message)
    }

    fn start(bar: ProgressBar, template: &str, message: &str) -> Self {
        if !ui::terminal().progress {
            return Self(None);
        }
        if let Ok(style) = ProgressStyle::with_template(template) {
            bar.set_style(style);
        }
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        Self(Some(bar))
    }

    /// Count one finished meeting.
    pub fn advance(&self, meeting_id: &str) {
        if let Some(bar) = &self.0 {
            bar.set_message(meeting_id.to_string());
            bar.inc(1);
        }
    }

    pub fn done(&self, message: &str) {
        if let Some(bar) = &self.0 {
            bar.finish_with_message(message.to_string());
        }
    }

    pub fn clear(&self) {
        if let Some(bar) = &self.0 {
            bar.finish_and_clear();
        }
    }

    pub fn abandon(&self, message: &str) {
        if let Some(bar) = &self.0 {
            bar.abandon_with_message(message.to_string());
        }
    }
}
