//! Progress reporting for the conversation driver

use colloquy_application::{DriverError, TickProgressNotifier, TickReport};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Shows a spinner on stderr while a tick is being generated.
///
/// The spinner is shared with the console follower, which prints messages
/// through [`ProgressBar::suspend`] so the two never interleave.
pub struct TickProgressReporter {
    spinner: ProgressBar,
}

impl TickProgressReporter {
    pub fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(Self::spinner_style());
        Self { spinner }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    /// Handle to the spinner, for printing around it
    pub fn spinner(&self) -> ProgressBar {
        self.spinner.clone()
    }

    pub fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

impl Default for TickProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl TickProgressNotifier for TickProgressReporter {
    fn on_tick_start(&self, tick: u64) {
        self.spinner.set_prefix(format!("Tick {}", tick));
        self.spinner.set_message("generating...");
        self.spinner.enable_steady_tick(Duration::from_millis(120));
    }

    fn on_tick_complete(&self, report: &TickReport) {
        self.spinner.disable_steady_tick();
        self.spinner.set_message(format!(
            "{} {} messages",
            "done".green(),
            report.sequences.len()
        ));
    }

    fn on_tick_failed(&self, tick: u64, error: &DriverError) {
        self.spinner.disable_steady_tick();
        self.spinner.suspend(|| {
            eprintln!("  {} tick {} abandoned: {}", "x".red(), tick, error);
        });
        self.spinner.set_message("waiting for next tick".dimmed().to_string());
    }
}

/// Simple text-based progress on stderr (no spinner)
pub struct SimpleTickProgress;

impl TickProgressNotifier for SimpleTickProgress {
    fn on_tick_start(&self, tick: u64) {
        eprintln!("{} {}", "->".cyan(), format!("Tick {}", tick).bold());
    }

    fn on_tick_complete(&self, report: &TickReport) {
        eprintln!("  {} {} messages", "v".green(), report.sequences.len());
    }

    fn on_tick_failed(&self, tick: u64, error: &DriverError) {
        eprintln!("  {} tick {} abandoned: {}", "x".red(), tick, error);
    }
}
