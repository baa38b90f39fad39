//! Bounded conversation log
//!
//! A single writer appends [`Entry`] values forever; the log keeps only the
//! most recent `capacity` of them. Any number of readers retrieve what they
//! have not seen yet by presenting a [`Cursor`] to
//! [`BoundedLog::read_since`]. The log keeps no per-reader state.
//!
//! ```text
//!   evicted          retained (len <= capacity)
//!  ┌───────────┬───────────────────────────────────┐
//!  │ 0 .. base │ base .. next                      │ next ...
//!  └───────────┴───────────────────────────────────┘
//!                ▲ cursor < base  → clamped, truncated = true
//!                        ▲ base <= cursor <= next → exact
//! ```

mod bounded_log;
mod cursor;
mod entry;

pub use bounded_log::{BoundedLog, DEFAULT_CAPACITY, LogRead, LogStats};
pub use cursor::Cursor;
pub use entry::{Entry, Sequence};
