//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`]: construction-time domain errors

pub mod error;
