//! Read Conversation use case
//!
//! The reader side of the bounded log. [`ConversationFeed`] turns a
//! [`LogRead`](colloquy_domain::LogRead) into the message shape an outer
//! layer presents ("new messages since last poll"). The caller keeps the
//! cursor: a web layer stores `next_cursor` per client session, an
//! in-process reader uses [`FeedFollower`].

use colloquy_domain::{BoundedLog, Cursor, Entry, Sequence};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// One message as presented to a polling client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedMessage {
    pub sequence: Sequence,
    /// Speaking agent
    pub chatbot: String,
    pub message: String,
}

impl From<Entry> for FeedMessage {
    fn from(entry: Entry) -> Self {
        Self {
            sequence: entry.sequence(),
            chatbot: entry.speaker().to_string(),
            message: entry.text().to_string(),
        }
    }
}

/// Result of one poll
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedPage {
    pub messages: Vec<FeedMessage>,
    /// Cursor to present on the next poll
    pub next_cursor: Cursor,
    /// Some requested messages were evicted before this poll
    pub truncated: bool,
    /// How many messages were evicted between the requested cursor and the
    /// first returned message
    pub missed: u64,
}

impl FeedPage {
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Stateless polling facade over the shared log
#[derive(Debug, Clone)]
pub struct ConversationFeed {
    log: Arc<BoundedLog>,
}

impl ConversationFeed {
    pub fn new(log: Arc<BoundedLog>) -> Self {
        Self { log }
    }

    /// Messages with `sequence >= cursor` that are still retained.
    pub fn poll(&self, cursor: Cursor) -> FeedPage {
        let read = self.log.read_since(cursor);

        let missed = if read.truncated {
            let resumed_at = read
                .entries
                .first()
                .map(Entry::sequence)
                .unwrap_or(read.next_cursor.sequence());
            resumed_at.saturating_sub(cursor.sequence())
        } else {
            0
        };

        if read.truncated {
            warn!(
                cursor = cursor.sequence(),
                missed, "Reader fell behind eviction; resuming at oldest retained message"
            );
        }
        debug!(
            cursor = cursor.sequence(),
            returned = read.entries.len(),
            next = read.next_cursor.sequence(),
            "Polled conversation"
        );

        FeedPage {
            messages: read.entries.into_iter().map(FeedMessage::from).collect(),
            next_cursor: read.next_cursor,
            truncated: read.truncated,
            missed,
        }
    }

    /// Cursor that starts a new reader at (at most) the last `count`
    /// retained messages instead of the whole history.
    pub fn tail_cursor(&self, count: usize) -> Cursor {
        let stats = self.log.stats();
        let start = stats
            .next_sequence
            .saturating_sub(count as u64)
            .max(stats.base_sequence);
        Cursor::new(start)
    }

    pub fn log(&self) -> &Arc<BoundedLog> {
        &self.log
    }
}

/// A reader that keeps its own cursor between polls
#[derive(Debug, Clone)]
pub struct FeedFollower {
    feed: ConversationFeed,
    cursor: Cursor,
}

impl FeedFollower {
    /// Follow from the very first retained message
    pub fn new(feed: ConversationFeed) -> Self {
        Self::starting_at(feed, Cursor::START)
    }

    pub fn starting_at(feed: ConversationFeed, cursor: Cursor) -> Self {
        Self { feed, cursor }
    }

    /// Poll once and advance the cursor
    pub fn next_page(&mut self) -> FeedPage {
        let page = self.feed.poll(self.cursor);
        self.cursor = page.next_cursor;
        page
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }
}
