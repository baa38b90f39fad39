//! Use cases
//!
//! - [`run_conversation`]: the single writer: drives the two agents
//! - [`read_conversation`]: the many readers: cursor-based polling

pub mod read_conversation;
pub mod run_conversation;
