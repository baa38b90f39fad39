//! Prompt domain
//!
//! Phrasing for the questions and replies agents exchange, and the prompts
//! sent to the text generator.

mod template;

pub use template::PromptTemplate;
