//! Subtopic extractors
//!
//! Both extractors end in a keyword pick; they differ in what text the pick
//! runs on.

use async_trait::async_trait;
use colloquy_application::{GenerationError, SubtopicExtractor, TextGenerator};
use colloquy_domain::{PromptTemplate, pick_keyword};
use std::sync::Arc;
use tracing::{debug, warn};

/// Picks the salient word of the prior context directly
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordSubtopicExtractor;

impl KeywordSubtopicExtractor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SubtopicExtractor for KeywordSubtopicExtractor {
    async fn generate_subtopic(&self, seed_text: &str) -> Result<String, GenerationError> {
        pick_keyword(seed_text).ok_or(GenerationError::EmptyOutput)
    }
}

/// Condenses the prior context with a text generator, then picks the salient
/// word of the summary.
///
/// A failed or keyword-free summary falls back to picking from the seed text
/// itself.
pub struct SummarizingSubtopicExtractor<G: ?Sized> {
    generator: Arc<G>,
}

impl<G: TextGenerator + ?Sized> SummarizingSubtopicExtractor<G> {
    pub fn new(generator: Arc<G>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl<G: TextGenerator + ?Sized> SubtopicExtractor for SummarizingSubtopicExtractor<G> {
    async fn generate_subtopic(&self, seed_text: &str) -> Result<String, GenerationError> {
        let prompt = PromptTemplate::summary_prompt(seed_text);

        match self.generator.generate_text(&prompt).await {
            Ok(summary) => {
                if let Some(keyword) = pick_keyword(&summary) {
                    debug!(%keyword, "Subtopic taken from summary");
                    return Ok(keyword);
                }
                debug!("Summary had no usable keyword; using prior context");
            }
            Err(e) => warn!("Summarization failed, using prior context: {}", e),
        }

        pick_keyword(seed_text).ok_or(GenerationError::EmptyOutput)
    }
}
