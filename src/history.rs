//! Undo/redo over piece placement snapshots
//!
//! `past` holds the state before each edit (oldest first, capped), `future`
//! holds states undone since the last edit.

use std::collections::VecDeque;

use crate::consts::HISTORY_CAP;
use crate::sim::Snapshot;

/// Bounded undo/redo stacks
#[derive(Debug, Clone)]
pub struct History {
    past: VecDeque<Snapshot>,
    future: Vec<Snapshot>,
    cap: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    pub fn new() -> Self {
        Self::with_cap(HISTORY_CAP)
    }

    /// History keeping at most `cap` undo steps
    pub fn with_cap(cap: usize) -> Self {
        Self {
            past: VecDeque::new(),
            future: Vec::new(),
            cap: cap.max(1),
        }
    }

    /// Record the state from before an edit; a new edit invalidates redo
    pub fn record(&mut self, before: Snapshot) {
        self.future.clear();
        self.push_past(before);
    }

    /// Step back: returns the snapshot to restore, stashing `current` for redo
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let previous = self.past.pop_back()?;
        self.future.push(current);
        Some(previous)
    }

    /// Step forward: returns the snapshot to restore, stashing `current` for undo
    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let next = self.future.pop()?;
        self.push_past(current);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.future.len()
    }

    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }

    fn push_past(&mut self, snapshot: Snapshot) {
        self.past.push_back(snapshot);
        while self.past.len() > self.cap {
            self.past.pop_front();
        }
    }
}
