use crate::ports::ProgressPort;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner on stderr; the total file count is unknown in a single streaming
/// pass, so there is no bounded bar to draw.
pub struct ProgressBarAdapter {
    bar: ProgressBar,
    quiet: bool,
}

impl ProgressBarAdapter {
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap(),
        );
        Self { bar, quiet: false }
    }

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        if quiet {
            self.bar = ProgressBar::hidden();
        }
        self
    }
}

impl Default for ProgressBarAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressPort for ProgressBarAdapter {
    fn start(&self) {
        if self.quiet {
            return;
        }
        self.bar.set_message("Scanning...");
        self.bar.enable_steady_tick(Duration::from_millis(100));
    }

    fn update(&self, files_seen: u64, duplicates: u64) {
        if self.quiet {
            return;
        }
        self.bar
            .set_message(format!("{files_seen} files scanned, {duplicates} duplicates"));
    }

    fn finish(&self) {
        if self.quiet {
            return;
        }
        self.bar.disable_steady_tick();
        self.bar.finish_and_clear();
    }
}
