//! Prompt templates for the conversation flow

use crate::util::truncate_str;

/// Longest seed text handed to summarization, in bytes
pub const MAX_SUMMARY_INPUT_BYTES: usize = 2000;

/// Templates for the texts agents exchange each tick
pub struct PromptTemplate;

impl PromptTemplate {
    /// Opening question on a general topic
    pub fn opening_question(topic: &str) -> String {
        format!("let us talk about {}?", topic)
    }

    /// Follow-up question built around a subtopic of the previous exchange
    pub fn follow_up_question(subtopic: &str, partner: &str) -> String {
        format!(
            "{}, earlier we touched on {}. What do you make of {}?",
            partner, subtopic, subtopic
        )
    }

    /// Prompt handed to the text generator when answering a question
    pub fn response_prompt(question: &str) -> String {
        question.trim().to_string()
    }

    /// Generated text wrapped with who is answering whom
    pub fn attributed_response(speaker: &str, asker: &str, text: &str) -> String {
        format!("{} replying to {}: {}", speaker, asker, text.trim())
    }

    /// Prompt asking the generator to condense prior context
    pub fn summary_prompt(seed_text: &str) -> String {
        format!(
            "Summarize the following in one short sentence:\n\n{}\n\nSummary:",
            truncate_str(seed_text.trim(), MAX_SUMMARY_INPUT_BYTES)
        )
    }
}
