//! Bounded game message log and the observer hook for collaborators.
//!
//! Every state change appends a human-readable message. The wording is a
//! soft contract: simulation tooling pattern-matches phrases such as
//! `"raided"`, `"brought"`, `"assassinated"` and `"CASTLE DESTROYED"`.
//!
//! A `LogSink` sees each entry as it is appended, optionally together with a
//! full `BoardSnapshot`, which is how simulation runs capture the board state
//! next to every event.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::rules::BoardSnapshot;

/// One log message tagged with when it happened.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub round: u32,
    pub turn: u32,
    pub text: String,
}

/// Observer for the game's message stream.
pub trait LogSink: std::fmt::Debug {
    /// Request a board snapshot with every entry. Snapshots are only built when asked for.
    fn wants_snapshot(&self) -> bool {
        false
    }

    /// Called after an entry is appended to the log.
    fn record(&mut self, entry: &LogEntry, snapshot: Option<BoardSnapshot>);

    /// Called when the most recent entry is withdrawn (a cancelled field draw).
    fn retract(&mut self) {}
}

/// Append-only log that evicts its oldest entries past a fixed capacity.
#[derive(Clone, Debug)]
pub struct MessageLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl MessageLog {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, entry: LogEntry) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// Remove and return the newest entry.
    pub fn pop(&mut self) -> Option<LogEntry> {
        self.entries.pop_back()
    }

    #[must_use]
    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.back()
    }

    /// Entries oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    /// Message texts oldest first.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.text.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
