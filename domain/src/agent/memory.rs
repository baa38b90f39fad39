//! Per-agent conversation memory

use std::collections::VecDeque;
use std::num::NonZeroUsize;

/// Ordered record of the texts an agent produced or asked.
///
/// Unbounded unless a retention limit is given; with a limit, pushing past
/// it drops the oldest item.
#[derive(Debug, Clone, Default)]
pub struct AgentMemory {
    items: VecDeque<String>,
    limit: Option<NonZeroUsize>,
}

impl AgentMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Memory that keeps only the most recent `limit` items
    pub fn with_limit(limit: NonZeroUsize) -> Self {
        Self {
            items: VecDeque::with_capacity(limit.get()),
            limit: Some(limit),
        }
    }

    /// Memory bounded by `limit`, where `0` means unbounded
    pub fn from_limit(limit: usize) -> Self {
        NonZeroUsize::new(limit)
            .map(Self::with_limit)
            .unwrap_or_default()
    }

    pub fn push(&mut self, text: impl Into<String>) {
        self.items.push_back(text.into());
        if let Some(limit) = self.limit {
            while self.items.len() > limit.get() {
                self.items.pop_front();
            }
        }
    }

    /// Most recently pushed item
    pub fn latest(&self) -> Option<&str> {
        self.items.back().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn limit(&self) -> Option<NonZeroUsize> {
        self.limit
    }

    /// Items oldest first
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }
}
