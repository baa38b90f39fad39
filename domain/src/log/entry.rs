//! Log entry value object

use serde::{Deserialize, Serialize};

/// Global sequence number assigned to an entry at append time.
pub type Sequence = u64;

/// One immutable, sequence-numbered message produced by an agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    sequence: Sequence,
    speaker: String,
    text: String,
}

impl Entry {
    pub(crate) fn new(sequence: Sequence, speaker: String, text: String) -> Self {
        Self {
            sequence,
            speaker,
            text,
        }
    }

    /// Sequence number assigned by the log
    pub fn sequence(&self) -> Sequence {
        self.sequence
    }

    /// Label of the agent that produced this entry
    pub fn speaker(&self) -> &str {
        &self.speaker
    }

    /// Message content
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl std::fmt::Display for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{} {}: {}", self.sequence, self.speaker, self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_accessors() {
        let entry = Entry::new(7, "Bot 1".to_string(), "hello".to_string());
        assert_eq!(entry.sequence(), 7);
        assert_eq!(entry.speaker(), "Bot 1");
        assert_eq!(entry.text(), "hello");
    }

    #[test]
    fn test_entry_display() {
        let entry = Entry::new(3, "Bot 2".to_string(), "hi there".to_string());
        assert_eq!(entry.to_string(), "#3 Bot 2: hi there");
    }

    #[test]
    fn test_entry_serializes_flat() {
        let entry = Entry::new(0, "Bot 1".to_string(), "x".to_string());
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["sequence"], 0);
        assert_eq!(json["speaker"], "Bot 1");
        assert_eq!(json["text"], "x");
    }
}
