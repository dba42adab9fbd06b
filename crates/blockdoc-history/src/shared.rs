//! Shared, re-entrant access to one [`History`].
//!
//! Editors hand [`SharedHistory`] clones to plugins, listeners and async
//! tasks. A call that arrives while the history is busy (typically an
//! adapter or listener reacting to an undo in progress) is queued in an inbox
//! and applied, in arrival order, as soon as the running call returns. The
//! replay in progress is never interleaved with foreign mutations.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::future::Future;
use std::rc::Rc;

use blockdoc_crdt::{CrdtLog, OpStore};

use crate::adapter::{DocumentAdapter, Mutation};
use crate::error::HistoryError;
use crate::history::History;
use crate::operation::{OperationId, Payload};
use crate::oplog::LogRecord;

/// A deferred history call.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Edit(Payload),
    Capture(Mutation),
    StopCapturing,
    EnterAtomic,
    ExitAtomic,
    Undo,
    Redo,
}

pub struct SharedHistory<D, S = CrdtLog<LogRecord>> {
    inner: Rc<RefCell<History<D, S>>>,
    inbox: Rc<RefCell<VecDeque<Command>>>,
}

impl<D, S> Clone for SharedHistory<D, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
            inbox: Rc::clone(&self.inbox),
        }
    }
}

impl<D: DocumentAdapter, S: OpStore<LogRecord>> SharedHistory<D, S> {
    pub fn new(history: History<D, S>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(history)),
            inbox: Rc::new(RefCell::new(VecDeque::new())),
        }
    }

    /// Runs `f` against the history. Returns `None` when the history is busy.
    pub fn with<T>(&self, f: impl FnOnce(&mut History<D, S>) -> T) -> Option<T> {
        let result = {
            let mut history = self.inner.try_borrow_mut().ok()?;
            f(&mut history)
        };
        self.drain();
        Some(result)
    }

    /// Reads the history. Returns `None` while a mutating call is running.
    pub fn read<T>(&self, f: impl FnOnce(&History<D, S>) -> T) -> Option<T> {
        let history = self.inner.try_borrow().ok()?;
        Some(f(&history))
    }

    /// Applies and captures `payload`. Returns `Ok(None)` when the call was
    /// queued behind a running one.
    pub fn edit(&self, payload: Payload) -> Result<Option<OperationId>, HistoryError> {
        match self.with(|h| h.edit(payload.clone())) {
            Some(result) => result.map(Some),
            None => {
                self.enqueue(Command::Edit(payload));
                Ok(None)
            }
        }
    }

    pub fn capture(&self, mutation: Mutation) -> Result<Option<OperationId>, HistoryError> {
        match self.with(|h| h.capture(mutation.clone())) {
            Some(result) => result.map(Some),
            None => {
                self.enqueue(Command::Capture(mutation));
                Ok(None)
            }
        }
    }

    pub fn stop_capturing(&self) {
        self.run(Command::StopCapturing);
    }

    /// Undoes one step. A queued undo reports `false`.
    pub fn undo(&self) -> bool {
        self.run(Command::Undo)
    }

    /// Redoes one step. A queued redo reports `false`.
    pub fn redo(&self) -> bool {
        self.run(Command::Redo)
    }

    pub fn poll_timers(&self) -> bool {
        self.with(|h| h.poll_timers()).unwrap_or(false)
    }

    /// Number of queued calls.
    pub fn pending(&self) -> usize {
        self.inbox.borrow().len()
    }

    /// Runs `body` inside an atomic scope that stays open across `.await`
    /// points. Everything captured through any handle while the scope is
    /// open defaults to one undo step. The scope closes when `body`
    /// completes or its future is dropped.
    pub async fn with_atomic_scope<F, Fut, T>(&self, body: F) -> T
    where
        F: FnOnce(SharedHistory<D, S>) -> Fut,
        Fut: Future<Output = T>,
    {
        self.run(Command::EnterAtomic);
        let _scope = ScopeGuard {
            shared: self.clone(),
        };
        body(self.clone()).await
    }

    /// Applies every queued call the history can take right now.
    pub fn drain(&self) {
        loop {
            let Some(command) = self.inbox.borrow_mut().pop_front() else {
                return;
            };
            let Ok(mut history) = self.inner.try_borrow_mut() else {
                self.inbox.borrow_mut().push_front(command);
                return;
            };
            execute(&mut history, command);
        }
    }

    fn run(&self, command: Command) -> bool {
        let outcome = match self.inner.try_borrow_mut() {
            Ok(mut history) => Some(execute(&mut history, command)),
            Err(_) => {
                self.enqueue(command);
                None
            }
        };
        match outcome {
            Some(done) => {
                self.drain();
                done
            }
            None => false,
        }
    }

    fn enqueue(&self, command: Command) {
        tracing::trace!(?command, "history busy; call queued");
        self.inbox.borrow_mut().push_back(command);
    }
}

struct ScopeGuard<D: DocumentAdapter, S: OpStore<LogRecord>> {
    shared: SharedHistory<D, S>,
}

impl<D: DocumentAdapter, S: OpStore<LogRecord>> Drop for ScopeGuard<D, S> {
    fn drop(&mut self) {
        self.shared.run(Command::ExitAtomic);
    }
}

fn execute<D: DocumentAdapter, S: OpStore<LogRecord>>(
    history: &mut History<D, S>,
    command: Command,
) -> bool {
    let result = match command {
        Command::Edit(payload) => history.edit(payload).map(|_| true),
        Command::Capture(mutation) => history.capture(mutation).map(|_| true),
        Command::StopCapturing => {
            history.stop_capturing();
            Ok(true)
        }
        Command::EnterAtomic => {
            history.enter_atomic_scope();
            Ok(true)
        }
        Command::ExitAtomic => {
            history.exit_atomic_scope();
            Ok(true)
        }
        Command::Undo => history.try_undo(),
        Command::Redo => history.try_redo(),
    };
    result.unwrap_or_else(|err| {
        tracing::warn!(error = %err, "history call failed");
        false
    })
}
