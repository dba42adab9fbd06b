//! Undo/redo stacks of closed transactions.

use std::collections::VecDeque;

use crate::transaction::Transaction;

/// Two bounded stacks, most recent at the back. Linear history: committing
/// a new transaction drops everything that could have been redone.
#[derive(Debug, Clone)]
pub struct UndoRedoStacks {
    undo: VecDeque<Transaction>,
    redo: VecDeque<Transaction>,
    max_entries: usize,
}

impl UndoRedoStacks {
    pub fn new(max_entries: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: VecDeque::new(),
            max_entries: max_entries.max(1),
        }
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Pushes a freshly closed transaction from normal editing. Clears the
    /// redo stack and returns the evicted oldest entry, if any.
    pub fn commit(&mut self, transaction: Transaction) -> Option<Transaction> {
        self.redo.clear();
        push_bounded(&mut self.undo, transaction, self.max_entries)
    }

    pub fn pop_undo(&mut self) -> Option<Transaction> {
        self.undo.pop_back()
    }

    pub fn pop_redo(&mut self) -> Option<Transaction> {
        self.redo.pop_back()
    }

    /// Pushes a transaction that was just undone.
    pub fn push_redo(&mut self, transaction: Transaction) -> Option<Transaction> {
        push_bounded(&mut self.redo, transaction, self.max_entries)
    }

    /// Pushes a transaction that was just redone. Unlike
    /// [`commit`](Self::commit) this keeps the redo stack.
    pub fn push_undo(&mut self, transaction: Transaction) -> Option<Transaction> {
        push_bounded(&mut self.undo, transaction, self.max_entries)
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// Undo entries, oldest first.
    pub fn undo_entries(&self) -> impl Iterator<Item = &Transaction> {
        self.undo.iter()
    }

    /// Redo entries, oldest first.
    pub fn redo_entries(&self) -> impl Iterator<Item = &Transaction> {
        self.redo.iter()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

fn push_bounded(
    stack: &mut VecDeque<Transaction>,
    transaction: Transaction,
    max_entries: usize,
) -> Option<Transaction> {
    stack.push_back(transaction);
    if stack.len() > max_entries {
        stack.pop_front()
    } else {
        None
    }
}
