//! Transcript logging
//!
//! Provides [`JsonlTranscriptLogger`], an append-only JSONL file writer that
//! implements the [`ConversationLogger`](colloquy_application::ConversationLogger)
//! port. The in-memory log forgets old entries; the transcript keeps them.

mod jsonl_logger;

pub use jsonl_logger::JsonlTranscriptLogger;
