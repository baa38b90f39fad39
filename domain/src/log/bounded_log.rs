//! Capacity-limited, sequence-numbered conversation log

use super::cursor::Cursor;
use super::entry::{Entry, Sequence};
use crate::core::error::DomainError;
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::VecDeque;
use std::ops::Range;

/// Number of retained entries when no capacity is configured.
pub const DEFAULT_CAPACITY: usize = 1000;

/// Result of [`BoundedLog::read_since`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogRead {
    /// Entries with `sequence >= max(cursor, base_sequence)`, oldest first
    pub entries: Vec<Entry>,
    /// Cursor to present on the following read
    pub next_cursor: Cursor,
    /// The requested cursor had already been evicted; `entries` starts at
    /// the oldest retained entry instead
    pub truncated: bool,
}

impl LogRead {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Point-in-time counters, read under a single lock acquisition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LogStats {
    pub capacity: usize,
    pub retained: usize,
    pub base_sequence: Sequence,
    pub next_sequence: Sequence,
    /// Entries dropped by eviction so far
    pub evicted: u64,
}

/// Thread-safe bounded log with monotonically increasing sequence numbers.
///
/// The buffer and both sequence counters live behind one [`RwLock`], so a
/// reader observes each append (including its eviction) entirely or not at
/// all. Readers share the lock and copy entries out; the writer holds it
/// exclusively only for the push and the front trim.
#[derive(Debug)]
pub struct BoundedLog {
    capacity: usize,
    state: RwLock<LogState>,
}

#[derive(Debug)]
struct LogState {
    /// Contiguous run of sequences ending at `next_sequence - 1`
    buffer: VecDeque<Entry>,
    next_sequence: Sequence,
}

impl LogState {
    fn base_sequence(&self) -> Sequence {
        self.buffer
            .front()
            .map(Entry::sequence)
            .unwrap_or(self.next_sequence)
    }

    fn push(&mut self, capacity: usize, speaker: String, text: String) -> Sequence {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.buffer.push_back(Entry::new(sequence, speaker, text));
        while self.buffer.len() > capacity {
            self.buffer.pop_front();
        }
        sequence
    }
}

impl BoundedLog {
    /// Create an empty log retaining at most `capacity` entries.
    pub fn new(capacity: usize) -> Result<Self, DomainError> {
        if capacity == 0 {
            return Err(DomainError::InvalidCapacity(capacity));
        }
        Ok(Self {
            capacity,
            state: RwLock::new(LogState {
                buffer: VecDeque::with_capacity(capacity.min(DEFAULT_CAPACITY)),
                next_sequence: 0,
            }),
        })
    }

    /// Create an empty log with [`DEFAULT_CAPACITY`].
    pub fn with_default_capacity() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            state: RwLock::new(LogState {
                buffer: VecDeque::with_capacity(DEFAULT_CAPACITY),
                next_sequence: 0,
            }),
        }
    }

    /// Append one entry, evicting the oldest ones beyond capacity.
    ///
    /// Returns the sequence assigned to the new entry.
    pub fn append(&self, speaker: impl Into<String>, text: impl Into<String>) -> Sequence {
        let speaker = speaker.into();
        let text = text.into();
        self.state.write().push(self.capacity, speaker, text)
    }

    /// Append several entries as one unit.
    ///
    /// Concurrent readers see either none or all of the batch. Returns the
    /// range of sequences assigned; an empty batch returns an empty range
    /// starting at the current `next_sequence`.
    pub fn append_batch<I, S, T>(&self, items: I) -> Range<Sequence>
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<String>,
    {
        let items: Vec<(String, String)> = items
            .into_iter()
            .map(|(speaker, text)| (speaker.into(), text.into()))
            .collect();

        let mut state = self.state.write();
        let start = state.next_sequence;
        for (speaker, text) in items {
            state.push(self.capacity, speaker, text);
        }
        start..state.next_sequence
    }

    /// Everything with `sequence >= cursor` that is still retained.
    ///
    /// A cursor below the oldest retained entry is clamped and flagged with
    /// `truncated`; a cursor past the newest entry yields nothing. The
    /// returned `next_cursor` is always the current `next_sequence`.
    pub fn read_since(&self, cursor: Cursor) -> LogRead {
        let state = self.state.read();
        let base = state.base_sequence();
        let next = state.next_sequence;

        let requested = cursor.sequence();
        let start = requested.clamp(base, next);
        let offset = (start - base) as usize;

        LogRead {
            entries: state.buffer.range(offset..).cloned().collect(),
            next_cursor: Cursor::new(next),
            truncated: requested < base,
        }
    }

    /// Maximum number of retained entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of currently retained entries
    pub fn len(&self) -> usize {
        self.state.read().buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().buffer.is_empty()
    }

    /// Sequence of the oldest retained entry, or of the next append when empty
    pub fn base_sequence(&self) -> Sequence {
        self.state.read().base_sequence()
    }

    /// Sequence the next append will receive
    pub fn next_sequence(&self) -> Sequence {
        self.state.read().next_sequence
    }

    pub fn stats(&self) -> LogStats {
        let state = self.state.read();
        let base_sequence = state.base_sequence();
        LogStats {
            capacity: self.capacity,
            retained: state.buffer.len(),
            base_sequence,
            next_sequence: state.next_sequence,
            evicted: base_sequence,
        }
    }
}

impl Default for BoundedLog {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::Arc;
    use std::thread;

    fn log_with(capacity: usize, texts: &[&str]) -> BoundedLog {
        let log = BoundedLog::new(capacity).unwrap();
        for text in texts {
            log.append("Bot", *text);
        }
        log
    }

    fn texts(read: &LogRead) -> Vec<&str> {
        read.entries.iter().map(Entry::text).collect()
    }

    fn sequences(read: &LogRead) -> Vec<Sequence> {
        read.entries.iter().map(Entry::sequence).collect()
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        assert_eq!(
            BoundedLog::new(0).unwrap_err(),
            DomainError::InvalidCapacity(0)
        );
    }

    #[test]
    fn test_default_capacity() {
        assert_eq!(BoundedLog::default().capacity(), DEFAULT_CAPACITY);
    }

    #[test]
    fn test_empty_log() {
        let log = BoundedLog::new(3).unwrap();
        assert!(log.is_empty());
        assert_eq!(log.base_sequence(), 0);
        assert_eq!(log.next_sequence(), 0);

        let read = log.read_since(Cursor::START);
        assert!(read.is_empty());
        assert_eq!(read.next_cursor, Cursor::new(0));
        assert!(!read.truncated);
    }

    #[test]
    fn test_append_returns_consecutive_sequences() {
        let log = BoundedLog::new(2).unwrap();
        assert_eq!(log.append("a", "1"), 0);
        assert_eq!(log.append("b", "2"), 1);
        assert_eq!(log.append("a", "3"), 2);
        assert_eq!(log.next_sequence(), 3);
    }

    #[test]
    fn test_capacity_three_scenario() {
        let log = log_with(3, &["A", "B", "C", "D"]);
        assert_eq!(log.len(), 3);
        assert_eq!(log.base_sequence(), 1);

        let read = log.read_since(Cursor::new(0));
        assert_eq!(texts(&read), vec!["B", "C", "D"]);
        assert_eq!(read.next_cursor, Cursor::new(4));
        assert!(read.truncated);

        let read = log.read_since(Cursor::new(2));
        assert_eq!(texts(&read), vec!["C", "D"]);
        assert_eq!(read.next_cursor, Cursor::new(4));
        assert!(!read.truncated);

        let read = log.read_since(Cursor::new(4));
        assert!(read.is_empty());
        assert_eq!(read.next_cursor, Cursor::new(4));
        assert!(!read.truncated);
    }

    #[test]
    fn test_cursor_past_end_is_not_an_error() {
        let log = log_with(3, &["A"]);
        let read = log.read_since(Cursor::new(100));
        assert!(read.is_empty());
        assert_eq!(read.next_cursor, Cursor::new(1));
        assert!(!read.truncated);
    }

    #[test]
    fn test_cursor_at_base_is_not_truncated() {
        let log = log_with(2, &["A", "B", "C"]);
        let read = log.read_since(Cursor::new(1));
        assert_eq!(texts(&read), vec!["B", "C"]);
        assert!(!read.truncated);
    }

    #[test]
    fn test_repoll_is_idempotent() {
        let log = log_with(5, &["A", "B", "C"]);
        let first = log.read_since(Cursor::new(1));
        let second = log.read_since(Cursor::new(1));
        assert_eq!(first, second);
    }

    #[test]
    fn test_snapshot_survives_eviction() {
        let log = log_with(2, &["A", "B"]);
        let snapshot = log.read_since(Cursor::START);
        log.append("Bot", "C");
        log.append("Bot", "D");
        assert_eq!(texts(&snapshot), vec!["A", "B"]);
    }

    #[test]
    fn test_append_batch_assigns_range() {
        let log = BoundedLog::new(10).unwrap();
        log.append("a", "0");
        let range = log.append_batch([("a", "1"), ("b", "2"), ("b", "3"), ("a", "4")]);
        assert_eq!(range, 1..5);
        assert_eq!(
            sequences(&log.read_since(Cursor::START)),
            vec![0, 1, 2, 3, 4]
        );
    }

    #[test]
    fn test_empty_batch_is_a_no_op() {
        let log = log_with(3, &["A", "B"]);
        let range = log.append_batch(Vec::<(String, String)>::new());
        assert_eq!(range, 2..2);
        assert_eq!(log.next_sequence(), 2);
    }

    #[test]
    fn test_batch_larger_than_capacity_keeps_tail() {
        let log = BoundedLog::new(2).unwrap();
        let range = log.append_batch([("a", "1"), ("a", "2"), ("a", "3")]);
        assert_eq!(range, 0..3);
        assert_eq!(texts(&log.read_since(Cursor::START)), vec!["2", "3"]);
        assert_eq!(log.base_sequence(), 1);
    }

    #[test]
    fn test_stats_are_consistent() {
        let log = log_with(3, &["A", "B", "C", "D", "E"]);
        let stats = log.stats();
        assert_eq!(stats.capacity, 3);
        assert_eq!(stats.retained, 3);
        assert_eq!(stats.base_sequence, 2);
        assert_eq!(stats.next_sequence, 5);
        assert_eq!(stats.evicted, 2);
    }

    #[test]
    fn test_concurrent_readers_never_see_gaps_or_duplicates() {
        const TOTAL: u64 = 5_000;
        let log = Arc::new(BoundedLog::new(64).unwrap());

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let log = Arc::clone(&log);
                thread::spawn(move || {
                    let mut cursor = Cursor::START;
                    let mut seen = Vec::new();
                    let mut truncations = 0u64;
                    while cursor.sequence() < TOTAL {
                        let read = log.read_since(cursor);
                        if read.truncated {
                            truncations += 1;
                        } else if let Some(first) = read.entries.first() {
                            assert_eq!(first.sequence(), cursor.sequence());
                        }
                        for pair in read.entries.windows(2) {
                            assert_eq!(pair[0].sequence() + 1, pair[1].sequence());
                        }
                        if let Some(last) = read.entries.last() {
                            assert_eq!(last.sequence() + 1, read.next_cursor.sequence());
                        }
                        for entry in &read.entries {
                            assert_eq!(entry.text(), entry.sequence().to_string());
                        }
                        assert!(read.next_cursor >= cursor);
                        seen.extend(read.entries.iter().map(Entry::sequence));
                        cursor = read.next_cursor;
                    }
                    (seen, truncations)
                })
            })
            .collect();

        for i in 0..TOTAL {
            log.append("writer", i.to_string());
        }

        for reader in readers {
            let (seen, truncations) = reader.join().unwrap();
            for pair in seen.windows(2) {
                assert!(pair[0] < pair[1], "sequence delivered twice or out of order");
            }
            if truncations == 0 {
                assert_eq!(seen.len() as u64, TOTAL);
            }
        }
    }

    #[test]
    fn test_batches_are_observed_whole() {
        const BATCHES: u64 = 2_000;
        let log = Arc::new(BoundedLog::new(400).unwrap());

        let reader = {
            let log = Arc::clone(&log);
            thread::spawn(move || {
                let mut cursor = Cursor::START;
                while cursor.sequence() < BATCHES * 4 {
                    let read = log.read_since(cursor);
                    assert_eq!(read.next_cursor.sequence() % 4, 0);
                    cursor = read.next_cursor;
                }
            })
        };

        for i in 0..BATCHES {
            log.append_batch((0..4).map(|j| ("writer", format!("{}-{}", i, j))));
        }
        reader.join().unwrap();
    }

    proptest! {
        #[test]
        fn prop_sequences_are_dense_and_bounded(capacity in 1usize..16, appends in 0usize..64) {
            let log = BoundedLog::new(capacity).unwrap();
            for i in 0..appends {
                prop_assert_eq!(log.append("p", i.to_string()), i as Sequence);
                prop_assert!(log.len() <= capacity);
            }

            let read = log.read_since(Cursor::START);
            let expected_len = appends.min(capacity);
            prop_assert_eq!(read.entries.len(), expected_len);
            prop_assert_eq!(read.truncated, appends > capacity);
            let expected: Vec<Sequence> =
                ((appends - expected_len) as Sequence..appends as Sequence).collect();
            prop_assert_eq!(sequences(&read), expected);
        }

        #[test]
        fn prop_read_since_contract(capacity in 1usize..16, appends in 0usize..64, cursor in 0u64..80) {
            let log = BoundedLog::new(capacity).unwrap();
            for i in 0..appends {
                log.append("p", i.to_string());
            }
            let base = log.base_sequence();
            let next = log.next_sequence();
            let read = log.read_since(Cursor::new(cursor));

            prop_assert_eq!(read.next_cursor, Cursor::new(next));
            prop_assert_eq!(read.truncated, cursor < base);
            let start = cursor.clamp(base, next);
            let expected: Vec<Sequence> = (start..next).collect();
            prop_assert_eq!(sequences(&read), expected);
        }

        #[test]
        fn prop_polling_reader_sees_each_sequence_once(
            capacity in 4usize..32,
            bursts in proptest::collection::vec(0usize..4, 1..40),
        ) {
            let log = BoundedLog::new(capacity).unwrap();
            let mut cursor = Cursor::START;
            let mut seen: Vec<Sequence> = Vec::new();
            let mut counter = 0u64;
            for burst in bursts {
                for _ in 0..burst {
                    log.append("p", counter.to_string());
                    counter += 1;
                }
                let read = log.read_since(cursor);
                prop_assert!(!read.truncated);
                seen.extend(sequences(&read));
                cursor = read.next_cursor;
            }
            let expected: Vec<Sequence> = (0..counter).collect();
            prop_assert_eq!(seen, expected);
        }
    }
}
