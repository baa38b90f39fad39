//! Infrastructure layer for colloquy
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer: text generators, subtopic extractors and the JSONL
//! transcript, plus configuration file loading.

pub mod config;
pub mod generators;
pub mod logging;

// Re-export commonly used types
pub use config::{ConfigLoader, ConfigValidationError, FileConfig, GeneratorProvider};
#[cfg(feature = "http-generator")]
pub use generators::OpenAiCompatibleGenerator;
pub use generators::{
    BabbleGenerator, GeneratorSetupError, Generators, KeywordSubtopicExtractor,
    SummarizingSubtopicExtractor,
};
pub use logging::JsonlTranscriptLogger;
