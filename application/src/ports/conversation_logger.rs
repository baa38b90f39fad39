//! Port for structured transcript logging.
//!
//! Defines the [`ConversationLogger`] trait for recording driver events
//! (appended entries, failed ticks) to a structured transcript.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostics, while this port captures the conversation
//! itself in a machine-readable format (JSONL).

use serde_json::Value;

/// Event type for an entry appended to the log
pub const ENTRY_APPENDED: &str = "entry_appended";

/// Event type for a tick abandoned after a generation failure
pub const TICK_FAILED: &str = "tick_failed";

/// A structured transcript event.
///
/// Each event has a type string and a JSON payload containing
/// event-specific fields. The logger adds the timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationEvent {
    /// Event type identifier (e.g., "entry_appended", "tick_failed").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging transcript events.
///
/// Implementations write each event as a single record (e.g., one JSONL line).
/// `log` is synchronous and infallible; write failures are dropped so the
/// driver never stalls on its transcript.
pub trait ConversationLogger: Send + Sync {
    /// Record a transcript event.
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when the transcript is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
