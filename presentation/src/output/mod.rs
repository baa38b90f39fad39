//! Formatting of followed conversation pages

pub mod console;
pub mod formatter;
pub mod json;
