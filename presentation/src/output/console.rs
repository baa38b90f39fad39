//! Console output formatter for the conversation

use crate::output::formatter::OutputFormatter;
use colloquy_application::{DriverSummary, FeedMessage};
use colored::Colorize;

/// Formats messages as colored `speaker: message` lines
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    pub fn format_message(message: &FeedMessage) -> String {
        format!(
            "{} {}",
            format!("{}:", message.chatbot).cyan().bold(),
            Self::indent_continuation(&message.message, message.chatbot.len() + 2)
        )
    }

    pub fn format_gap(missed: u64) -> String {
        let noun = if missed == 1 { "message" } else { "messages" };
        format!("{}", format!("... {} earlier {} no longer retained ...", missed, noun).dimmed())
    }

    pub fn format_summary(summary: &DriverSummary) -> String {
        let mut output = format!(
            "{} {} ticks completed, {} entries",
            "Conversation stopped:".yellow().bold(),
            summary.ticks_completed,
            summary.entries_appended
        );
        if summary.ticks_failed > 0 {
            output.push_str(&format!(", {}", format!("{} ticks failed", summary.ticks_failed).red()));
        }
        output
    }

    /// Align continuation lines of a multi-line message under its first line
    fn indent_continuation(text: &str, width: usize) -> String {
        let pad = " ".repeat(width);
        text.lines()
            .enumerate()
            .map(|(i, line)| if i == 0 { line.to_string() } else { format!("{}{}", pad, line) })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_message(&self, message: &FeedMessage) -> String {
        Self::format_message(message)
    }

    fn format_gap(&self, missed: u64) -> String {
        Self::format_gap(missed)
    }

    fn format_summary(&self, summary: &DriverSummary) -> String {
        Self::format_summary(summary)
    }
}
