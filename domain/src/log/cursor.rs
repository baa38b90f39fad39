//! Reader cursor value object

use super::entry::Sequence;
use serde::{Deserialize, Serialize};

/// The next sequence number a reader has not yet retrieved.
///
/// Owned by the reader. Store the `next_cursor` of one read and present it
/// on the following read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(Sequence);

impl Cursor {
    /// Cursor of a reader that has seen nothing yet
    pub const START: Cursor = Cursor(0);

    pub fn new(sequence: Sequence) -> Self {
        Self(sequence)
    }

    /// Raw sequence value
    pub fn sequence(self) -> Sequence {
        self.0
    }
}

impl From<Sequence> for Cursor {
    fn from(sequence: Sequence) -> Self {
        Self(sequence)
    }
}

impl std::fmt::Display for Cursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Cursor {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Cursor)
    }
}
