//! Domain layer for colloquy
//!
//! This crate contains the core data structures of the endless two-agent
//! conversation. It has no dependencies on infrastructure or presentation
//! concerns and performs no I/O.
//!
//! # Core Concepts
//!
//! ## Bounded log
//!
//! [`BoundedLog`] is the single point of truth for the conversation. One
//! writer appends; any number of readers poll with their own [`Cursor`].
//! Only the most recent `capacity` entries are retained, and a reader whose
//! cursor fell behind eviction is told so through [`LogRead::truncated`].
//!
//! ## Agents and topics
//!
//! - [`Agent`]: a name plus private [`AgentMemory`]
//! - [`TopicSeeds`]: general topics for opening questions
//! - [`pick_keyword`]: salient-word choice for follow-ups

pub mod agent;
pub mod core;
pub mod log;
pub mod prompt;
pub mod topic;
pub mod util;

// Re-export commonly used types
pub use agent::{Agent, AgentMemory};
pub use core::error::DomainError;
pub use log::{BoundedLog, Cursor, DEFAULT_CAPACITY, Entry, LogRead, LogStats, Sequence};
pub use prompt::PromptTemplate;
pub use topic::{TopicSeeds, pick_keyword};
