use console::{style, user_attended_stderr};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use std::time::Duration;

/// spinner shown while a request to the run server is in flight
pub struct StatusSpinner<'a> {
    multi: &'a MultiProgress,
    bar: ProgressBar,
}

impl<'a> StatusSpinner<'a> {
    pub fn new(loading: &str, multi: &'a MultiProgress) -> Self {
        let bar = if user_attended_stderr() {
            let bar = multi.add(ProgressBar::new_spinner());
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        } else {
            // piped session: nothing to animate
            ProgressBar::hidden()
        };
        bar.set_message(style(loading).yellow().bright().to_string());
        Self { bar, multi }
    }

    /// drop the spinner line; the caller prints the result itself
    pub fn clear(&self) {
        self.bar.finish_and_clear();
        self.multi.remove(&self.bar);
    }

    /// leave a red cross with the failure message
    pub fn fail(&self, message: &str) {
        self.bar.set_style(
            ProgressStyle::default_spinner()
                .template("{prefix} {msg}")
                .unwrap(),
        );
        self.bar.set_prefix(style("✕").red().bold().to_string());
        self.bar.finish_with_message(style(message).red().bright().to_string());

        self.multi.remove(&self.bar);
    }
}
