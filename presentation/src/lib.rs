//! Presentation layer for colloquy
//!
//! This crate contains the CLI definition, output formatters, tick progress
//! reporters and the console follower that prints the conversation.

pub mod cli;
pub mod follow;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, OutputFormat, ProviderArg};
pub use follow::{ConsoleFollower, FollowStats};
pub use output::console::ConsoleFormatter;
pub use output::formatter::{OutputFormatter, formatter_for};
pub use output::json::JsonFormatter;
pub use progress::reporter::{SimpleTickProgress, TickProgressReporter};
