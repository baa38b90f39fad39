//! Driver parameters for the tick loop

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How the entries produced in one tick reach the log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TickCommit {
    /// Append each entry as soon as it is produced; a failure mid-tick
    /// leaves the entries produced so far in the log.
    #[default]
    Immediate,
    /// Stage the tick's entries and append them as one batch only when all
    /// four were produced. A failed tick also leaves agent memory untouched.
    Atomic,
}

impl TickCommit {
    pub fn from_atomic_flag(atomic: bool) -> Self {
        if atomic {
            TickCommit::Atomic
        } else {
            TickCommit::Immediate
        }
    }
}

/// Tick loop control parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Pause between the end of one tick and the start of the next.
    pub tick_interval: Duration,
    /// Upper bound for a single collaborator call. `None` waits forever.
    pub generation_timeout: Option<Duration>,
    /// How produced entries are committed.
    pub tick_commit: TickCommit,
    /// Items each agent remembers; `0` keeps everything.
    pub memory_limit: usize,
    /// Stop after this many attempted ticks. `None` runs until cancelled.
    pub max_ticks: Option<u64>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(10),
            generation_timeout: Some(Duration::from_secs(120)),
            tick_commit: TickCommit::Immediate,
            memory_limit: 0,
            max_ticks: None,
        }
    }
}

impl DriverConfig {
    // ==================== Builder Methods ====================

    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    pub fn with_generation_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.generation_timeout = timeout;
        self
    }

    /// Timeout in seconds where `0` disables the limit
    pub fn with_generation_timeout_secs(self, seconds: u64) -> Self {
        let timeout = (seconds > 0).then(|| Duration::from_secs(seconds));
        self.with_generation_timeout(timeout)
    }

    pub fn with_tick_commit(mut self, commit: TickCommit) -> Self {
        self.tick_commit = commit;
        self
    }

    pub fn with_memory_limit(mut self, limit: usize) -> Self {
        self.memory_limit = limit;
        self
    }

    pub fn with_max_ticks(mut self, max: Option<u64>) -> Self {
        self.max_ticks = max;
        self
    }
}
