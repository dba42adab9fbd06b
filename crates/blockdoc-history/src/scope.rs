//! Atomic scope guard. While an [`AtomicScope`] is alive, captures share one
//! transaction unless `stop_capturing` splits it. Dropping the outermost
//! guard ends the scope.

use std::ops::{Deref, DerefMut};

use blockdoc_crdt::OpStore;

use crate::adapter::DocumentAdapter;
use crate::history::History;
use crate::oplog::LogRecord;

/// Guard for an atomic capture scope. Derefs to the [`History`] so edits can
/// be made through it; the scope ends when the guard drops, including on
/// early return or unwinding.
pub struct AtomicScope<'a, D: DocumentAdapter, S: OpStore<LogRecord>> {
    history: &'a mut History<D, S>,
}

impl<'a, D: DocumentAdapter, S: OpStore<LogRecord>> AtomicScope<'a, D, S> {
    pub(crate) fn enter(history: &'a mut History<D, S>) -> Self {
        history.enter_atomic_scope();
        Self { history }
    }
}

impl<D: DocumentAdapter, S: OpStore<LogRecord>> Deref for AtomicScope<'_, D, S> {
    type Target = History<D, S>;

    fn deref(&self) -> &Self::Target {
        self.history
    }
}

impl<D: DocumentAdapter, S: OpStore<LogRecord>> DerefMut for AtomicScope<'_, D, S> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.history
    }
}

impl<D: DocumentAdapter, S: OpStore<LogRecord>> Drop for AtomicScope<'_, D, S> {
    fn drop(&mut self) {
        self.history.exit_atomic_scope();
    }
}
