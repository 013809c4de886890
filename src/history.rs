//! Linear undo/redo history of model snapshots.
//!
//! Entries are immutable `Rc<Snapshot>`s taken at commit points. The stack is
//! bounded: pushing past the limit evicts the oldest entry. The cursor always
//! points at the snapshot that matches the live model, so undo steps back one
//! entry and redo steps forward one; both are no-ops at the ends.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use std::collections::VecDeque;
use std::rc::Rc;

use crate::doc::{CanvasElement, ConnectorElement};

/// Deep copy of the model at a commit point. Selection is not part of it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub elements: Vec<CanvasElement>,
    pub connectors: Vec<ConnectorElement>,
}

/// Bounded linear history.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<Rc<Snapshot>>,
    index: usize,
    limit: usize,
}

impl History {
    /// Create an empty history retaining at most `limit` entries (minimum 1).
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self { entries: VecDeque::new(), index: 0, limit: limit.max(1) }
    }

    /// Drop every entry and start over from `initial`.
    pub fn reset(&mut self, initial: Snapshot) {
        self.entries.clear();
        self.entries.push_back(Rc::new(initial));
        self.index = 0;
    }

    /// Append a snapshot after the cursor, discarding any redo tail, and move
    /// the cursor to it. Returns the stored entry.
    pub fn push(&mut self, snapshot: Snapshot) -> Rc<Snapshot> {
        if !self.entries.is_empty() {
            self.entries.truncate(self.index + 1);
        }
        let entry = Rc::new(snapshot);
        self.entries.push_back(Rc::clone(&entry));
        while self.entries.len() > self.limit {
            self.entries.pop_front();
        }
        self.index = self.entries.len() - 1;
        entry
    }

    /// Step back one entry, returning the snapshot to restore.
    pub fn undo(&mut self) -> Option<Rc<Snapshot>> {
        if !self.can_undo() {
            return None;
        }
        self.index -= 1;
        self.entries.get(self.index).cloned()
    }

    /// Step forward one entry, returning the snapshot to restore.
    pub fn redo(&mut self) -> Option<Rc<Snapshot>> {
        if !self.can_redo() {
            return None;
        }
        self.index += 1;
        self.entries.get(self.index).cloned()
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.index > 0 && !self.entries.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    /// The entry under the cursor.
    #[must_use]
    pub fn current(&self) -> Option<Rc<Snapshot>> {
        self.entries.get(self.index).cloned()
    }

    /// Cursor position (0 = oldest retained entry).
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of retained entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Retained entries, oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &Snapshot> {
        self.entries.iter().map(|e| &**e)
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(crate::consts::HISTORY_LIMIT)
    }
}
