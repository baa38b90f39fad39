//! Text generation ports
//!
//! Defines the two collaborators the conversation driver consumes: one that
//! produces a reply for a prompt, and one that extracts a follow-up subtopic
//! from prior context. Implementations (adapters) live in the
//! infrastructure layer.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while generating text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Generator returned empty output")]
    EmptyOutput,

    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    #[error("Other error: {0}")]
    Other(String),
}

impl GenerationError {
    /// Check if this error came from the per-call time limit
    pub fn is_timeout(&self) -> bool {
        matches!(self, GenerationError::Timeout(_))
    }
}

/// Response generation
///
/// May be slow (local inference can take seconds); must return finite text
/// or fail.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a continuation or reply for `prompt`
    async fn generate_text(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// Subtopic extraction from prior context
///
/// May fail or return blank text; callers fall back to a general topic.
#[async_trait]
pub trait SubtopicExtractor: Send + Sync {
    /// Derive a short subtopic (usually one word) from `seed_text`
    async fn generate_subtopic(&self, seed_text: &str) -> Result<String, GenerationError>;
}
