//! Topic seed list

use crate::core::error::DomainError;
use rand::Rng;
use rand::seq::SliceRandom;

/// Non-empty list of general topics used when an agent has nothing to
/// follow up on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicSeeds {
    topics: Vec<String>,
}

impl TopicSeeds {
    /// Build a seed list; blank topics are dropped before the emptiness check.
    pub fn new<I, S>(topics: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let topics: Vec<String> = topics
            .into_iter()
            .map(Into::into)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        if topics.is_empty() {
            return Err(DomainError::EmptyTopicSeeds);
        }
        Ok(Self { topics })
    }

    /// Pick one topic uniformly at random
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        // `topics` is non-empty by construction
        self.topics
            .choose(rng)
            .map(String::as_str)
            .unwrap_or(self.topics[0].as_str())
    }

    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }
}

impl Default for TopicSeeds {
    fn default() -> Self {
        Self {
            topics: vec![
                "AI getting consciousness and taking over the whole universe".to_string(),
                "how to contact aliens".to_string(),
            ],
        }
    }
}
