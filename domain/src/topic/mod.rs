//! Conversation topics
//!
//! - [`TopicSeeds`]: the non-empty list opening questions are drawn from
//! - [`pick_keyword`]: chooses the salient word of a text for follow-ups

mod keywords;
mod seeds;

pub use keywords::pick_keyword;
pub use seeds::TopicSeeds;
