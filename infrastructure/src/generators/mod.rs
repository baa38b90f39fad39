//! Text generator and subtopic extractor adapters
//!
//! Implements the [`TextGenerator`] and [`SubtopicExtractor`] ports, and
//! builds the configured pair from a [`FileGeneratorConfig`].

mod babble;
#[cfg(feature = "http-generator")]
mod openai;
mod subtopic;

pub use babble::BabbleGenerator;
#[cfg(feature = "http-generator")]
pub use openai::OpenAiCompatibleGenerator;
pub use subtopic::{KeywordSubtopicExtractor, SummarizingSubtopicExtractor};

use crate::config::{FileGeneratorConfig, GeneratorProvider};
use colloquy_application::{SubtopicExtractor, TextGenerator};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Errors building the configured generator
#[derive(Debug, Error)]
pub enum GeneratorSetupError {
    #[error("generator provider '{0}' requires the `http-generator` feature")]
    FeatureDisabled(GeneratorProvider),

    #[error("failed to set up generator: {0}")]
    Setup(String),
}

/// The collaborators the conversation driver needs
pub struct Generators {
    pub text: Arc<dyn TextGenerator>,
    pub subtopics: Arc<dyn SubtopicExtractor>,
}

impl Generators {
    /// Build the generator and extractor described by `config`
    pub fn from_config(config: &FileGeneratorConfig) -> Result<Self, GeneratorSetupError> {
        let text = text_generator(config)?;

        let subtopics: Arc<dyn SubtopicExtractor> = if config.summarize_subtopics {
            Arc::new(SummarizingSubtopicExtractor::new(Arc::clone(&text)))
        } else {
            Arc::new(KeywordSubtopicExtractor::new())
        };

        info!(
            provider = %config.provider,
            summarize = config.summarize_subtopics,
            "Generators ready"
        );
        Ok(Self { text, subtopics })
    }
}

fn text_generator(config: &FileGeneratorConfig) -> Result<Arc<dyn TextGenerator>, GeneratorSetupError> {
    match config.provider {
        GeneratorProvider::Babble => {
            let generator = match config.seed {
                Some(seed) => BabbleGenerator::with_seed(seed),
                None => BabbleGenerator::new(),
            };
            Ok(Arc::new(generator))
        }
        GeneratorProvider::OpenAi => openai_generator(config),
    }
}

#[cfg(feature = "http-generator")]
fn openai_generator(config: &FileGeneratorConfig) -> Result<Arc<dyn TextGenerator>, GeneratorSetupError> {
    let mut generator =
        OpenAiCompatibleGenerator::new(&config.base_url, config.model.clone(), config.max_tokens)
            .map_err(|e| GeneratorSetupError::Setup(e.to_string()))?;

    if let Some(var) = &config.api_key_env
        && let Ok(key) = std::env::var(var)
        && !key.trim().is_empty()
    {
        generator = generator.with_api_key(key.trim());
    }

    info!(endpoint = generator.endpoint(), model = %config.model, "Using completions endpoint");
    Ok(Arc::new(generator))
}

#[cfg(not(feature = "http-generator"))]
fn openai_generator(config: &FileGeneratorConfig) -> Result<Arc<dyn TextGenerator>, GeneratorSetupError> {
    Err(GeneratorSetupError::FeatureDisabled(config.provider))
}
