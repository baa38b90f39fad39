//! Application layer for colloquy
//!
//! This crate contains the conversation driver, the reader feed, port
//! definitions, and driver configuration. It depends only on the domain
//! layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{DriverConfig, TickCommit};
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    progress::{NoTickProgress, TickProgressNotifier},
    text_generator::{GenerationError, SubtopicExtractor, TextGenerator},
};
pub use use_cases::read_conversation::{ConversationFeed, FeedFollower, FeedMessage, FeedPage};
pub use use_cases::run_conversation::{
    ConversationDriver, DriverError, DriverSummary, TickReport,
};
