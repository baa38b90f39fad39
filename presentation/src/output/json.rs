//! JSON lines output, one object per message

use crate::output::formatter::OutputFormatter;
use colloquy_application::{DriverSummary, FeedMessage};

/// Formats each message as a compact JSON object
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format_message(&self, message: &FeedMessage) -> String {
        serde_json::to_string(message).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_gap(&self, missed: u64) -> String {
        serde_json::json!({ "gap": { "missed": missed } }).to_string()
    }

    fn format_summary(&self, summary: &DriverSummary) -> String {
        serde_json::json!({
            "stopped": {
                "ticks_completed": summary.ticks_completed,
                "ticks_failed": summary.ticks_failed,
                "entries_appended": summary.entries_appended,
            }
        })
        .to_string()
    }
}
