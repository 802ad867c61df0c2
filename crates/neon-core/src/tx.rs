// SPDX-License-Identifier: AGPL-3.0-only
//! All-or-nothing execution.
//!
//! Every public mutating operation runs through [`Transactional::transact`].
//! A contract opens a checkpoint, and while it is open each write records the
//! slot's previous value in an [`UndoLog`]. On `Err` the log is replayed
//! backwards and the event log is cut back to its checkpointed length, so
//! callers never observe a partially applied operation.
//!
//! Rollback cost is proportional to what the operation wrote, never to the
//! size of the contract or its history.

use crate::error::Result;

pub trait Transactional {
    type Checkpoint;

    fn checkpoint(&mut self) -> Self::Checkpoint;
    fn commit(&mut self, checkpoint: Self::Checkpoint);
    fn rollback(&mut self, checkpoint: Self::Checkpoint);

    fn transact<T, F>(&mut self, op: F) -> Result<T>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        let checkpoint = self.checkpoint();
        let result = op(self);
        match result {
            Ok(_) => self.commit(checkpoint),
            Err(_) => self.rollback(checkpoint),
        }
        result
    }
}

/// Journal of prior values. Writes made outside any checkpoint are not
/// recorded; nested checkpoints share one journal.
#[derive(Debug, Clone)]
pub struct UndoLog<U> {
    entries: Vec<U>,
    depth: usize,
}

impl<U> Default for UndoLog<U> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            depth: 0,
        }
    }
}

impl<U> UndoLog<U> {
    /// Open a checkpoint; returns its mark.
    pub fn begin(&mut self) -> usize {
        self.depth += 1;
        self.entries.len()
    }

    pub fn record(&mut self, undo: U) {
        if self.depth > 0 {
            self.entries.push(undo);
        }
    }

    /// Close a checkpoint keeping its writes. The journal is dropped once the
    /// outermost checkpoint commits.
    pub fn commit(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        if self.depth == 0 {
            self.entries.clear();
        }
    }

    /// Close a checkpoint discarding its writes. Returns the entries recorded
    /// since `mark`, newest first, for the caller to apply.
    pub fn unwind(&mut self, mark: usize) -> Vec<U> {
        self.depth = self.depth.saturating_sub(1);
        let mut undone = self.entries.split_off(mark.min(self.entries.len()));
        undone.reverse();
        if self.depth == 0 {
            self.entries.clear();
        }
        undone
    }

    /// Entries still held for open checkpoints.
    pub fn pending(&self) -> usize {
        self.entries.len()
    }
}
