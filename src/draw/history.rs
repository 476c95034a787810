//! Snapshot-based undo/redo history.

use super::Frame;
use log::debug;
use std::collections::VecDeque;

/// Linear undo/redo history storing full [`Frame`] snapshots.
///
/// Every entry is an owned clone, so later edits to the live frame never reach
/// back into the stacks. When `max_depth` is non-zero the oldest undo entry is
/// evicted once the stack grows past it.
#[derive(Debug, Clone, Default)]
pub struct History {
    undo: VecDeque<Frame>,
    redo: Vec<Frame>,
    max_depth: usize,
}

impl History {
    /// Creates a history; `max_depth == 0` keeps every snapshot.
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            max_depth,
        }
    }

    /// Captures `current` before a mutation and discards the redo branch.
    pub fn record(&mut self, current: &Frame) {
        self.push_undo(current.clone());
        self.redo.clear();
    }

    /// Restores the most recent snapshot into `current`.
    ///
    /// Returns `false` without touching anything when there is nothing to undo.
    pub fn undo(&mut self, current: &mut Frame) -> bool {
        let Some(previous) = self.undo.pop_back() else {
            return false;
        };
        let replaced = std::mem::replace(current, previous);
        self.redo.push(replaced);
        true
    }

    /// Re-applies the most recently undone snapshot into `current`.
    pub fn redo(&mut self, current: &mut Frame) -> bool {
        let Some(next) = self.redo.pop() else {
            return false;
        };
        let replaced = std::mem::replace(current, next);
        self.push_undo(replaced);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    fn push_undo(&mut self, frame: Frame) {
        self.undo.push_back(frame);
        if self.max_depth > 0 {
            while self.undo.len() > self.max_depth {
                self.undo.pop_front();
                debug!("History depth {} reached; evicted oldest snapshot", self.max_depth);
            }
        }
    }
}
