//! Agent domain module
//!
//! A conversational agent is a name plus the private memory of what it has
//! asked and answered. The driver owns both agents; nothing here is shared
//! between threads.

pub mod entities;
pub mod memory;

pub use entities::Agent;
pub use memory::AgentMemory;
