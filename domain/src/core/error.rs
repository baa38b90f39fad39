//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// Every variant is a construction-time misconfiguration; nothing in the
/// domain layer fails once its values have been built.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Log capacity must be at least 1 (got {0})")]
    InvalidCapacity(usize),

    #[error("Topic seed list cannot be empty")]
    EmptyTopicSeeds,

    #[error("Invalid agent name: {0:?}")]
    InvalidAgentName(String),
}

impl DomainError {
    /// Check if this error was caused by a bad configuration value
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            DomainError::InvalidCapacity(_)
                | DomainError::EmptyTopicSeeds
                | DomainError::InvalidAgentName(_)
        )
    }
}
