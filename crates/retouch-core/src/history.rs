//! Bounded linear undo/redo history.
//!
//! [`History`] stores full snapshots in chronological order plus a cursor
//! marking the active one. Entries before the cursor can be undone into,
//! entries after it can be redone into.
//!
//! ## Append rule
//!
//! 1. Drop every entry after the cursor (the redo branch)
//! 2. Push the new snapshot and move the cursor onto it
//! 3. While over the limit, evict the oldest entry and shift the cursor back
//!
//! Truncation and append always happen together inside [`History::push`].

use std::collections::VecDeque;

use tracing::debug;

use crate::decode::PixelBuffer;
use crate::session::SessionError;

/// Number of snapshots retained when no limit is configured.
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

/// Snapshot arena with a cursor.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<PixelBuffer>,
    cursor: usize,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl History {
    /// Create an empty history retaining at most `limit` snapshots.
    ///
    /// A limit of zero is raised to one so the active snapshot always fits.
    pub fn new(limit: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            cursor: 0,
            limit: limit.max(1),
        }
    }

    /// Discard everything and start over from `base`.
    pub fn restart(&mut self, base: PixelBuffer) {
        self.entries.clear();
        self.entries.push_back(base);
        self.cursor = 0;
    }

    /// Record a new snapshot after the cursor, discarding any redo branch.
    pub fn push(&mut self, next: PixelBuffer) {
        if !self.entries.is_empty() {
            let discarded = self.entries.len() - (self.cursor + 1);
            if discarded > 0 {
                debug!(discarded, "truncating redo branch");
            }
            self.entries.truncate(self.cursor + 1);
        }

        self.entries.push_back(next);
        self.cursor = self.entries.len() - 1;

        while self.entries.len() > self.limit {
            self.entries.pop_front();
            self.cursor -= 1;
            debug!(limit = self.limit, "evicted oldest snapshot");
        }
    }

    /// Step the cursor back one entry.
    pub fn undo(&mut self) -> Result<&PixelBuffer, SessionError> {
        if !self.can_undo() {
            return Err(SessionError::NoHistoryToUndo);
        }
        self.cursor -= 1;
        Ok(&self.entries[self.cursor])
    }

    /// Step the cursor forward one entry.
    pub fn redo(&mut self) -> Result<&PixelBuffer, SessionError> {
        if !self.can_redo() {
            return Err(SessionError::NoHistoryToRedo);
        }
        self.cursor += 1;
        Ok(&self.entries[self.cursor])
    }

    /// The active snapshot, if any.
    pub fn current(&self) -> Option<&PixelBuffer> {
        self.entries.get(self.cursor)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        !self.entries.is_empty() && self.cursor < self.entries.len() - 1
    }

    /// Number of retained snapshots.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the active snapshot among the retained ones.
    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Iterate over retained snapshots, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &PixelBuffer> {
        self.entries.iter()
    }
}
