//! Application-level configuration.
//!
//! [`DriverConfig`] controls how the conversation driver paces and commits
//! its ticks. Values come from the infrastructure config loader and CLI
//! flags; this layer only defines their meaning.

mod driver_config;

pub use driver_config::{DriverConfig, TickCommit};
