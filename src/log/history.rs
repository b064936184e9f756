// src/log/history.rs

use std::collections::VecDeque;

use tracing::trace;

use crate::log::ansi::strip_sgr;
use crate::log::entry::LogEntry;

/// Capped, ordered store of flushed entries. Oldest entries are evicted
/// first once the cap is reached.
#[derive(Debug)]
pub struct LogHistory {
    entries: VecDeque<LogEntry>,
    cap: usize,
}

impl LogHistory {
    /// `cap` is clamped to at least 1.
    pub fn new(cap: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            cap: cap.max(1),
        }
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn extend(&mut self, batch: impl IntoIterator<Item = LogEntry>) {
        self.entries.extend(batch);
        let overflow = self.entries.len().saturating_sub(self.cap);
        if overflow > 0 {
            trace!(overflow, cap = self.cap, "evicting oldest history entries");
            self.entries.drain(..overflow);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Case-insensitive substring filter over entry text.
#[derive(Debug, Clone, Default)]
pub struct LogFilter {
    needle: String,
    active: bool,
}

impl LogFilter {
    pub fn new(text: &str, active: bool) -> Self {
        Self {
            needle: text.to_lowercase(),
            active,
        }
    }

    /// An inactive filter, or one with empty text, matches everything.
    pub fn is_active(&self) -> bool {
        self.active && !self.needle.is_empty()
    }

    pub fn matches(&self, entry: &LogEntry) -> bool {
        if !self.is_active() {
            return true;
        }
        strip_sgr(&entry.text).to_lowercase().contains(&self.needle)
    }
}
