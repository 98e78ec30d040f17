use serde::{Deserialize, Serialize};

use crate::error::{ChessError, ChessResult};

/// Two-stack history: `done` holds applied entries, `undone` the ones that
/// can be replayed. Recording a fresh entry forgets everything undone.
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct UndoRedo<T> {
    done: Vec<T>,
    undone: Vec<T>,
}

impl<T: Clone> Default for UndoRedo<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> UndoRedo<T> {
    pub fn new() -> Self {
        UndoRedo {
            done: Vec::new(),
            undone: Vec::new(),
        }
    }

    pub fn record(&mut self, entry: T) {
        self.done.push(entry);
        self.undone.clear();
    }

    pub fn undo(&mut self) -> ChessResult<T> {
        let entry = self
            .done
            .pop()
            .ok_or_else(|| ChessError::invalid_state("Nothing to undo"))?;
        self.undone.push(entry.clone());
        Ok(entry)
    }

    pub fn redo(&mut self) -> ChessResult<T> {
        let entry = self
            .undone
            .pop()
            .ok_or_else(|| ChessError::invalid_state("Nothing to redo"))?;
        self.done.push(entry.clone());
        Ok(entry)
    }

    /// The most recently applied entry.
    pub fn peek(&self) -> ChessResult<&T> {
        self.done
            .last()
            .ok_or_else(|| ChessError::invalid_state("Nothing to peek"))
    }

    /// The entry `redo` would replay next.
    pub fn peek_undone(&self) -> ChessResult<&T> {
        self.undone
            .last()
            .ok_or_else(|| ChessError::invalid_state("Nothing to redo"))
    }

    pub fn can_undo(&self) -> bool {
        !self.done.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }

    pub fn len(&self) -> usize {
        self.done.len()
    }

    pub fn is_empty(&self) -> bool {
        self.done.is_empty()
    }
}
