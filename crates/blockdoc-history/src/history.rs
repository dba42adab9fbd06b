//! The history engine.
//!
//! [`History`] owns the document adapter and one [`HistoryState`]. Every
//! mutation goes through it. Undo and redo replay closed transactions through
//! the same adapter.
//!
//! # Example
//!
//! ```
//! use blockdoc_history::{Block, BlockDocument, History, HistoryConfig, ManualClock, Payload};
//!
//! let clock = ManualClock::new(0);
//! let config = HistoryConfig::default().with_new_group_delay(500);
//! let mut history = History::new(BlockDocument::new(), config)
//!     .unwrap()
//!     .with_clock(clock.clone());
//!
//! history
//!     .edit(Payload::InsertBlock { index: 0, block: Block::paragraph("a", "A") })
//!     .unwrap();
//! clock.advance(600);
//! history.poll_timers();
//!
//! assert!(history.undo());
//! assert!(history.document().is_empty());
//! assert!(history.redo());
//! assert_eq!(history.document().texts(), vec!["A"]);
//! ```

use blockdoc_crdt::{CrdtLog, OpStore, Ts};

use crate::adapter::{DocumentAdapter, Mutation};
use crate::capture::{BoundaryCause, CaptureController, CaptureState, ScopeExit, TimerToken};
use crate::config::{ConfigError, HistoryConfig};
use crate::error::{HistoryError, ReplayError, TimerError};
use crate::events::{ChangeEvent, HistoryEvent, ListenerId, Listeners};
use crate::operation::{OperationId, Origin, Payload, TransactionId};
use crate::oplog::{LogRecord, OperationLog, ReplayDirection};
use crate::scope::AtomicScope;
use crate::shortcuts::{resolve_shortcut, HistoryCommand, KeyChord};
use crate::stack::UndoRedoStacks;
use crate::time::{Clock, Millis, SystemClock};
use crate::transaction::Transaction;

/// Per-editor history state. At most one transaction is open at a time.
pub struct HistoryState<S = CrdtLog<LogRecord>> {
    pub(crate) stacks: UndoRedoStacks,
    pub(crate) open: Option<Transaction>,
    pub(crate) capture: CaptureController,
    pub(crate) log: OperationLog<S>,
    next_transaction: u64,
    destroyed: bool,
}

impl<S: OpStore<LogRecord>> HistoryState<S> {
    pub fn new(config: &HistoryConfig, log: OperationLog<S>) -> Self {
        Self {
            stacks: UndoRedoStacks::new(config.max_history_length),
            open: None,
            capture: CaptureController::new(config.new_group_delay, config.history_debounce_time),
            log,
            next_transaction: 1,
            destroyed: false,
        }
    }

    pub fn max_entries(&self) -> usize {
        self.stacks.max_entries()
    }

    pub fn undo_stack(&self) -> impl Iterator<Item = &Transaction> {
        self.stacks.undo_entries()
    }

    pub fn redo_stack(&self) -> impl Iterator<Item = &Transaction> {
        self.stacks.redo_entries()
    }

    pub fn open_transaction(&self) -> Option<&Transaction> {
        self.open.as_ref()
    }

    fn allocate_transaction(&mut self, at: Millis) -> Transaction {
        let id = TransactionId(self.next_transaction);
        self.next_transaction += 1;
        Transaction::open(id, at)
    }
}

pub struct History<D, S = CrdtLog<LogRecord>> {
    state: HistoryState<S>,
    adapter: D,
    config: HistoryConfig,
    clock: Box<dyn Clock>,
    listeners: Listeners,
}

impl<D: DocumentAdapter> History<D> {
    /// Creates a history backed by the CRDT op log.
    pub fn new(adapter: D, config: HistoryConfig) -> Result<Self, ConfigError> {
        Self::with_log(adapter, config, OperationLog::default())
    }
}

impl<D: DocumentAdapter, S: OpStore<LogRecord>> History<D, S> {
    /// Creates a history on top of any op store.
    pub fn with_log(
        adapter: D,
        config: HistoryConfig,
        log: OperationLog<S>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            state: HistoryState::new(&config, log),
            adapter,
            config,
            clock: Box::new(SystemClock::new()),
            listeners: Listeners::default(),
        })
    }

    /// Replaces the grouping clock.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    // ── Accessors ────────────────────────────────────────────────────────

    pub fn document(&self) -> &D {
        &self.adapter
    }

    /// Direct access to the document. Changes made here bypass the history
    /// unless they are reported through [`capture`](Self::capture).
    pub fn document_mut(&mut self) -> &mut D {
        &mut self.adapter
    }

    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    pub fn state(&self) -> &HistoryState<S> {
        &self.state
    }

    pub fn log(&self) -> &OperationLog<S> {
        &self.state.log
    }

    pub fn log_len(&self) -> usize {
        self.state.log.len()
    }

    pub fn capture_state(&self) -> CaptureState {
        self.state.capture.state()
    }

    pub fn open_transaction(&self) -> Option<&Transaction> {
        self.state.open.as_ref()
    }

    pub fn can_undo(&self) -> bool {
        self.state.stacks.undo_len() > 0 || self.has_pending_ops()
    }

    pub fn can_redo(&self) -> bool {
        self.state.stacks.redo_len() > 0 && !self.has_pending_ops()
    }

    pub fn undo_len(&self) -> usize {
        self.state.stacks.undo_len()
    }

    pub fn redo_len(&self) -> usize {
        self.state.stacks.redo_len()
    }

    pub fn is_destroyed(&self) -> bool {
        self.state.destroyed
    }

    fn has_pending_ops(&self) -> bool {
        self.state.open.as_ref().is_some_and(|tx| !tx.is_empty())
    }

    // ── Listeners ────────────────────────────────────────────────────────

    pub fn on_change<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&HistoryEvent) + 'static,
    {
        self.listeners.add(Box::new(listener))
    }

    pub fn off_change(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    // ── Capture ──────────────────────────────────────────────────────────

    /// Applies `payload` through the adapter and captures it.
    pub fn edit(&mut self, payload: Payload) -> Result<OperationId, HistoryError> {
        self.ensure_alive()?;
        let now = self.clock.now();
        self.fire_due(now);
        let inverse = self.adapter.apply(&payload)?;
        let mutation = Mutation::new(payload, inverse);
        let id = self.capture_at(&mutation, now);
        self.emit_edit(vec![id]);
        Ok(id)
    }

    /// Captures a change the editor already applied to the document.
    pub fn capture(&mut self, mutation: Mutation) -> Result<OperationId, HistoryError> {
        let mut ids = self.capture_batch(vec![mutation])?;
        Ok(ids.remove(0))
    }

    /// Captures several already-applied changes in one tick. Listeners see
    /// one change event for the whole batch.
    pub fn capture_batch(
        &mut self,
        mutations: Vec<Mutation>,
    ) -> Result<Vec<OperationId>, HistoryError> {
        self.ensure_alive()?;
        let now = self.clock.now();
        self.fire_due(now);
        let ids: Vec<OperationId> = mutations
            .iter()
            .map(|mutation| self.capture_at(mutation, now))
            .collect();
        if !ids.is_empty() {
            self.emit_edit(ids.clone());
        }
        Ok(ids)
    }

    fn capture_at(&mut self, mutation: &Mutation, now: Millis) -> OperationId {
        let state = &mut self.state;
        let opens = state.capture.on_mutation(now, state.open.is_some());
        let tx = match state.open.take() {
            Some(tx) if !opens => tx,
            _ => {
                let tx = state.allocate_transaction(now);
                tracing::trace!(transaction = %tx.id, at = now, "transaction opened");
                tx
            }
        };
        let tx = state.open.insert(tx);
        let log_id = state.log.record(mutation, tx.id, now);
        tx.push(mutation, now, || log_id)
    }

    /// Forces a capture boundary: the open transaction, if any, is closed and
    /// committed, and its timers are cancelled. The next mutation opens a new
    /// transaction. Calling this twice in a row is a no-op.
    pub fn stop_capturing(&mut self) {
        if self.state.destroyed {
            return;
        }
        let now = self.clock.now();
        self.close_open(now, BoundaryCause::Explicit);
    }

    // ── Timers ───────────────────────────────────────────────────────────

    /// Fires every timer due at the clock's current time. Returns `true`
    /// when a transaction was closed.
    pub fn poll_timers(&mut self) -> bool {
        if self.state.destroyed {
            return false;
        }
        let now = self.clock.now();
        self.fire_due(now)
    }

    /// The next armed timer and its deadline, for hosts that schedule timers
    /// themselves and report back through [`fire_timer`](Self::fire_timer).
    pub fn next_timer(&self) -> Option<(TimerToken, Millis)> {
        if self.state.destroyed {
            return None;
        }
        self.state.capture.next_timer()
    }

    /// Fires a timer previously handed out by [`next_timer`](Self::next_timer).
    /// Stale tokens close nothing.
    pub fn fire_timer(&mut self, token: TimerToken) -> Result<bool, TimerError> {
        if self.state.destroyed {
            tracing::trace!(?token, "timer fired after destroy; ignored");
            return Err(TimerError::Destroyed);
        }
        let now = self.clock.now();
        if let Err(err) = self.state.capture.check(token, now) {
            tracing::trace!(?token, %err, "timer ignored");
            return Err(err);
        }
        Ok(self.close_open(now, token.kind.into()))
    }

    fn fire_due(&mut self, now: Millis) -> bool {
        match self.state.capture.due(now) {
            Some((kind, deadline)) => self.close_open(deadline, kind.into()),
            None => false,
        }
    }

    /// Closes and commits the open transaction. Idempotent: with nothing
    /// open only the timers are cancelled.
    fn close_open(&mut self, at: Millis, cause: BoundaryCause) -> bool {
        self.state.capture.on_boundary();
        let Some(mut tx) = self.state.open.take() else {
            return false;
        };
        tx.close(at);
        if tx.is_empty() {
            return false;
        }
        let transaction = tx.id;
        let operations = tx.len();
        tracing::debug!(%transaction, operations, ?cause, "transaction committed");
        if let Some(evicted) = self.state.stacks.commit(tx) {
            tracing::trace!(transaction = %evicted.id, "oldest undo entry evicted");
            if self.config.auto_compact {
                self.compact_log();
            }
        }
        self.listeners.emit(HistoryEvent::Committed {
            transaction,
            operations,
        });
        true
    }

    // ── Atomic scopes ────────────────────────────────────────────────────

    /// Runs `body` inside an atomic scope: everything it captures defaults to
    /// one undo step, and `stop_capturing` inside it splits steps explicitly.
    pub fn with_atomic_scope<T>(&mut self, body: impl FnOnce(&mut Self) -> T) -> T {
        let mut scope = self.atomic_scope();
        body(&mut *scope)
    }

    /// Opens an atomic scope that ends when the guard drops.
    pub fn atomic_scope(&mut self) -> AtomicScope<'_, D, S> {
        AtomicScope::enter(self)
    }

    pub(crate) fn enter_atomic_scope(&mut self) {
        if self.state.destroyed {
            return;
        }
        self.state.capture.enter_atomic();
        tracing::trace!(depth = self.state.capture.atomic_depth(), "atomic scope entered");
    }

    pub(crate) fn exit_atomic_scope(&mut self) {
        if self.state.destroyed {
            return;
        }
        let now = self.clock.now();
        let has_open = self.has_pending_ops();
        match self.state.capture.exit_atomic(now, has_open) {
            ScopeExit::Nested => {}
            ScopeExit::Resume => tracing::trace!("atomic scope exited; typing group resumed"),
            ScopeExit::Close => {
                self.close_open(now, BoundaryCause::ScopeExit);
            }
        }
    }

    // ── Undo / redo ──────────────────────────────────────────────────────

    /// Reverts the most recent transaction. Returns `false` when there is
    /// nothing to undo or the replay failed.
    pub fn undo(&mut self) -> bool {
        self.try_undo().unwrap_or(false)
    }

    /// Re-applies the most recently undone transaction. Returns `false` when
    /// there is nothing to redo or the replay failed.
    pub fn redo(&mut self) -> bool {
        self.try_redo().unwrap_or(false)
    }

    pub fn try_undo(&mut self) -> Result<bool, HistoryError> {
        self.step(ReplayDirection::Undo)
    }

    pub fn try_redo(&mut self) -> Result<bool, HistoryError> {
        self.step(ReplayDirection::Redo)
    }

    fn step(&mut self, direction: ReplayDirection) -> Result<bool, HistoryError> {
        self.ensure_alive()?;
        let now = self.clock.now();
        self.fire_due(now);
        // Pending input is its own undo step and must not absorb the replay.
        self.close_open(now, BoundaryCause::Replay);

        let popped = match direction {
            ReplayDirection::Undo => self.state.stacks.pop_undo(),
            ReplayDirection::Redo => self.state.stacks.pop_redo(),
        };
        let Some(tx) = popped else {
            return Ok(false);
        };

        let replayed = match direction {
            ReplayDirection::Undo => self.state.log.replay_inverse(&tx, &mut self.adapter, now),
            ReplayDirection::Redo => self.state.log.replay_forward(&tx, &mut self.adapter, now),
        };
        match replayed {
            Ok(operations) => {
                let transaction = tx.id;
                tracing::debug!(%transaction, %direction, ops = operations.len(), "replayed");
                match direction {
                    ReplayDirection::Undo => self.state.stacks.push_redo(tx),
                    ReplayDirection::Redo => self.state.stacks.push_undo(tx),
                };
                self.listeners.emit(HistoryEvent::Changed(ChangeEvent {
                    origin: Origin::HistoryReplay,
                    operations,
                    transaction: Some(transaction),
                }));
                Ok(true)
            }
            Err(err) => {
                self.report_replay_failure(&err);
                Err(err.into())
            }
        }
    }

    fn report_replay_failure(&mut self, err: &ReplayError) {
        tracing::warn!(
            transaction = %err.transaction,
            direction = %err.direction,
            operation = %err.operation,
            error = %err.source,
            "replay failed; transaction dropped"
        );
        self.listeners.emit(HistoryEvent::ReplayFailed(err.clone()));
    }

    /// Runs the undo/redo command bound to `chord`, if any. Returns the
    /// command's result, or `None` when the chord is not a history shortcut.
    pub fn handle_shortcut(&mut self, chord: KeyChord, focused: bool) -> Option<bool> {
        match resolve_shortcut(chord, focused, self.config.global_undo_redo)? {
            HistoryCommand::Undo => Some(self.undo()),
            HistoryCommand::Redo => Some(self.redo()),
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────────────

    /// Drops both stacks and the open transaction. The document is untouched.
    pub fn clear(&mut self) {
        self.state.open = None;
        self.state.capture.reset();
        self.state.stacks.clear();
    }

    /// Drops log records no transaction on either stack still references.
    pub fn compact_log(&mut self) -> usize {
        let oldest = self
            .state
            .stacks
            .undo_entries()
            .chain(self.state.stacks.redo_entries())
            .chain(self.state.open.iter())
            .filter_map(Transaction::first_operation_id)
            .min();
        let through = match oldest {
            Some(OperationId(first)) => Ts::new(u64::MAX, first.time.saturating_sub(1)),
            None => match self.state.log.store().last_id() {
                Some(last) => last,
                None => return 0,
            },
        };
        let dropped = self.state.log.discard_through(OperationId(through));
        tracing::debug!(dropped, "op log compacted");
        dropped
    }

    /// Tears the engine down. Afterwards mutations fail with
    /// [`HistoryError::Destroyed`], timers are ignored, and undo/redo return
    /// `false`.
    pub fn destroy(&mut self) {
        if self.state.destroyed {
            return;
        }
        self.clear();
        self.listeners.clear();
        self.state.destroyed = true;
        tracing::debug!("history destroyed");
    }

    fn ensure_alive(&self) -> Result<(), HistoryError> {
        if self.state.destroyed {
            Err(HistoryError::Destroyed)
        } else {
            Ok(())
        }
    }

    fn emit_edit(&mut self, operations: Vec<OperationId>) {
        let transaction = self.state.open.as_ref().map(|tx| tx.id);
        self.listeners.emit(HistoryEvent::Changed(ChangeEvent {
            origin: Origin::Edit,
            operations,
            transaction,
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::BlockDocument;
    use crate::operation::Block;
    use crate::time::ManualClock;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn history(clock: &ManualClock) -> History<BlockDocument> {
        let config = HistoryConfig::default()
            .with_new_group_delay(500)
            .with_history_debounce_time(10_000);
        History::new(BlockDocument::new(), config)
            .unwrap()
            .with_clock(clock.clone())
    }

    fn insert(index: usize, id: &str) -> Payload {
        Payload::InsertBlock {
            index,
            block: Block::paragraph(id, id),
        }
    }

    #[test]
    fn mutations_close_to_each_other_share_a_transaction() {
        let clock = ManualClock::new(0);
        let mut h = history(&clock);
        h.edit(insert(0, "A")).unwrap();
        clock.advance(100);
        h.edit(insert(1, "B")).unwrap();
        assert_eq!(h.capture_state(), CaptureState::Capturing);
        assert_eq!(h.open_transaction().map(Transaction::len), Some(2));
        assert_eq!(h.undo_len(), 0);

        clock.advance(500);
        assert!(h.poll_timers());
        assert_eq!(h.capture_state(), CaptureState::Idle);
        assert_eq!(h.undo_len(), 1);
        assert!(!h.poll_timers());
    }

    #[test]
    fn late_mutation_closes_previous_group_without_polling() {
        let clock = ManualClock::new(0);
        let mut h = history(&clock);
        h.edit(insert(0, "A")).unwrap();
        clock.advance(500);
        h.edit(insert(1, "B")).unwrap();
        assert_eq!(h.undo_len(), 1);
        assert_eq!(h.state().undo_stack().next().and_then(|t| t.closed_at), Some(500));
    }

    #[test]
    fn debounce_caps_continuous_input() {
        let clock = ManualClock::new(0);
        let config = HistoryConfig::default()
            .with_new_group_delay(500)
            .with_history_debounce_time(300);
        let mut h = History::new(BlockDocument::new(), config)
            .unwrap()
            .with_clock(clock.clone());
        for i in 0..4 {
            h.edit(insert(i, &format!("b{i}"))).unwrap();
            clock.advance(100);
        }
        // Opened at 0, capped at 300: the fourth insert opened a new group.
        assert_eq!(h.undo_len(), 1);
        assert_eq!(h.open_transaction().map(Transaction::len), Some(1));
    }

    #[test]
    fn undo_commits_pending_input_first() {
        let clock = ManualClock::new(0);
        let mut h = history(&clock);
        h.edit(insert(0, "A")).unwrap();
        assert!(h.can_undo());
        assert!(h.undo());
        assert!(h.document().is_empty());
        assert_eq!(h.redo_len(), 1);
        assert!(h.open_transaction().is_none());
    }

    #[test]
    fn undo_on_empty_history_is_a_noop() {
        let clock = ManualClock::new(0);
        let mut h = history(&clock);
        assert!(!h.undo());
        assert!(!h.redo());
        assert!(h.document().is_empty());
    }

    #[test]
    fn stop_capturing_is_idempotent() {
        let clock = ManualClock::new(0);
        let mut h = history(&clock);
        h.edit(insert(0, "A")).unwrap();
        h.stop_capturing();
        h.stop_capturing();
        assert_eq!(h.undo_len(), 1);
        assert_eq!(h.next_timer(), None);
    }

    #[test]
    fn fire_timer_with_stale_token_is_ignored() {
        let clock = ManualClock::new(0);
        let mut h = history(&clock);
        h.edit(insert(0, "A")).unwrap();
        let (token, deadline) = h.next_timer().unwrap();
        h.stop_capturing();
        clock.set(deadline);
        assert_eq!(h.fire_timer(token), Err(TimerError::Stale));
        assert_eq!(h.undo_len(), 1);
    }

    #[test]
    fn fire_timer_closes_on_deadline() {
        let clock = ManualClock::new(0);
        let mut h = history(&clock);
        h.edit(insert(0, "A")).unwrap();
        let (token, deadline) = h.next_timer().unwrap();
        clock.set(deadline);
        assert_eq!(h.fire_timer(token), Ok(true));
        assert_eq!(h.undo_len(), 1);
    }

    #[test]
    fn listeners_see_edits_commits_and_replays() {
        let clock = ManualClock::new(0);
        let mut h = history(&clock);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let id = h.on_change(move |event| sink.borrow_mut().push(event.clone()));

        h.edit(insert(0, "A")).unwrap();
        h.undo();
        {
            let events = seen.borrow();
            assert_eq!(events.len(), 3);
            assert!(matches!(&events[0], HistoryEvent::Changed(e) if e.origin == Origin::Edit));
            assert!(matches!(&events[1], HistoryEvent::Committed { operations: 1, .. }));
            assert!(matches!(
                &events[2],
                HistoryEvent::Changed(e) if e.origin == Origin::HistoryReplay
            ));
        }

        assert!(h.off_change(id));
        h.redo();
        assert_eq!(seen.borrow().len(), 3);
    }

    #[test]
    fn capture_batch_emits_one_event() {
        let clock = ManualClock::new(0);
        let mut h = history(&clock);
        let count = Rc::new(RefCell::new(0));
        let sink = count.clone();
        h.on_change(move |_| *sink.borrow_mut() += 1);

        let mutations: Vec<Mutation> = ["A", "B"]
            .iter()
            .enumerate()
            .map(|(i, id)| {
                let forward = insert(i, id);
                let inverse = h.document_mut().apply(&forward).unwrap();
                Mutation::new(forward, inverse)
            })
            .collect();
        let ids = h.capture_batch(mutations).unwrap();
        assert_eq!(ids.len(), 2);
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn destroyed_history_rejects_everything() {
        let clock = ManualClock::new(0);
        let mut h = history(&clock);
        h.edit(insert(0, "A")).unwrap();
        let (token, _) = h.next_timer().unwrap();
        h.destroy();
        assert!(h.is_destroyed());
        assert!(matches!(h.edit(insert(1, "B")), Err(HistoryError::Destroyed)));
        assert!(!h.undo());
        assert_eq!(h.fire_timer(token), Err(TimerError::Destroyed));
        assert!(!h.poll_timers());
        assert_eq!(h.document().texts(), vec!["A"]);
    }

    #[test]
    fn compact_log_keeps_referenced_records() {
        let clock = ManualClock::new(0);
        let mut h = history(&clock);
        h.edit(insert(0, "A")).unwrap();
        h.stop_capturing();
        h.edit(insert(1, "B")).unwrap();
        h.stop_capturing();
        assert!(h.undo());
        assert_eq!(h.log_len(), 3);

        // Both transactions are still reachable.
        assert_eq!(h.compact_log(), 0);

        h.clear();
        assert_eq!(h.compact_log(), 3);
        assert!(h.log().is_empty());
    }

    #[test]
    fn eviction_trims_unreachable_log_records() {
        let clock = ManualClock::new(0);
        let config = HistoryConfig::default().with_max_history_length(2);
        let mut h = History::new(BlockDocument::new(), config)
            .unwrap()
            .with_clock(clock.clone());
        for i in 0..5 {
            h.edit(insert(i, &format!("b{i}"))).unwrap();
            h.stop_capturing();
        }
        assert_eq!(h.undo_len(), 2);
        assert_eq!(h.log_len(), 2);
        assert!(h.undo());
        assert!(h.undo());
        assert_eq!(h.document().texts(), vec!["b0", "b1", "b2"]);
    }

    #[test]
    fn eviction_keeps_log_when_auto_compact_is_off() {
        let clock = ManualClock::new(0);
        let config = HistoryConfig::default()
            .with_max_history_length(2)
            .with_auto_compact(false);
        let mut h = History::new(BlockDocument::new(), config)
            .unwrap()
            .with_clock(clock.clone());
        for i in 0..5 {
            h.edit(insert(i, &format!("b{i}"))).unwrap();
            h.stop_capturing();
        }
        assert_eq!(h.undo_len(), 2);
        assert_eq!(h.log_len(), 5);
    }

    #[test]
    fn shortcuts_drive_undo_and_redo() {
        let clock = ManualClock::new(0);
        let mut h = history(&clock);
        h.edit(insert(0, "A")).unwrap();
        assert_eq!(h.handle_shortcut(KeyChord::new('z').ctrl(), true), Some(true));
        assert_eq!(h.handle_shortcut(KeyChord::new('z').meta().shift(), true), Some(true));
        assert_eq!(h.handle_shortcut(KeyChord::new('z').ctrl(), false), None);
        assert_eq!(h.document().texts(), vec!["A"]);
    }
}
