//! Output formatter trait

use crate::cli::commands::OutputFormat;
use colloquy_application::{DriverSummary, FeedMessage};

/// Trait for formatting what a follower prints
pub trait OutputFormatter: Send + Sync {
    /// One line for a new message
    fn format_message(&self, message: &FeedMessage) -> String;

    /// Notice that `missed` messages were evicted before they could be shown
    fn format_gap(&self, missed: u64) -> String;

    /// Closing line once the driver has stopped
    fn format_summary(&self, summary: &DriverSummary) -> String;
}

/// Formatter for the selected output format
pub fn formatter_for(format: OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Text => Box::new(super::console::ConsoleFormatter),
        OutputFormat::Json => Box::new(super::json::JsonFormatter),
    }
}
