//! Agent entity

use super::memory::AgentMemory;
use crate::core::error::DomainError;

/// A named participant in the endless conversation.
#[derive(Debug, Clone)]
pub struct Agent {
    name: String,
    memory: AgentMemory,
}

impl Agent {
    /// Create an agent with unbounded memory.
    ///
    /// The name is trimmed; a blank name is rejected.
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        Self::with_memory(name, AgentMemory::new())
    }

    pub fn with_memory(name: impl Into<String>, memory: AgentMemory) -> Result<Self, DomainError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidAgentName(name));
        }
        Ok(Self {
            name: trimmed.to_string(),
            memory,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn memory(&self) -> &AgentMemory {
        &self.memory
    }

    /// Record something this agent said or asked
    pub fn remember(&mut self, text: impl Into<String>) {
        self.memory.push(text);
    }

    /// The most recent thing this agent said, used to seed a follow-up
    pub fn last_said(&self) -> Option<&str> {
        self.memory.latest()
    }
}
