//! Operation Log: every mutation the engine sees, in causal order.
//!
//! The log is append-only. Undo and redo never rewrite past entries; each
//! replayed payload is appended as a new record tagged
//! [`Origin::HistoryReplay`]. Storage sits behind [`OpStore`], with the
//! CRDT-backed [`CrdtLog`] as the default.

use std::fmt;

use blockdoc_crdt::{CrdtLog, OpStore, SESSION};
use serde::{Deserialize, Serialize};

use crate::adapter::{DocumentAdapter, Mutation};
use crate::error::ReplayError;
use crate::operation::{Operation, OperationId, OperationKind, Origin, Payload, TargetId, TransactionId};
use crate::time::Millis;
use crate::transaction::Transaction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplayDirection {
    Undo,
    Redo,
}

impl fmt::Display for ReplayDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplayDirection::Undo => f.write_str("undo"),
            ReplayDirection::Redo => f.write_str("redo"),
        }
    }
}

/// One log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub origin: Origin,
    /// Transaction the mutation was captured into. Replays belong to none.
    pub transaction: Option<TransactionId>,
    pub kind: OperationKind,
    pub target: TargetId,
    pub forward: Payload,
    pub inverse: Payload,
    pub at: Millis,
}

pub struct OperationLog<S = CrdtLog<LogRecord>> {
    store: S,
}

impl OperationLog<CrdtLog<LogRecord>> {
    /// CRDT-backed log writing as session `sid`.
    pub fn crdt(sid: u64) -> Self {
        Self::new(CrdtLog::new(sid))
    }

    /// Merges another replica's log into this one. Commutative and
    /// idempotent; returns the number of new entries.
    pub fn merge(&mut self, other: &Self) -> usize {
        self.store.merge(&other.store)
    }
}

impl Default for OperationLog<CrdtLog<LogRecord>> {
    fn default() -> Self {
        Self::crdt(SESSION::MIN_USER)
    }
}

impl<S: OpStore<LogRecord>> OperationLog<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn get(&self, id: OperationId) -> Option<&LogRecord> {
        self.store.get(id.0)
    }

    pub fn records(&self) -> impl Iterator<Item = (OperationId, &LogRecord)> + '_ {
        self.store.entries().map(|(id, r)| (OperationId(id), r))
    }

    /// Records a captured mutation and returns its log id.
    pub(crate) fn record(
        &mut self,
        mutation: &Mutation,
        transaction: TransactionId,
        at: Millis,
    ) -> OperationId {
        OperationId(self.store.append(LogRecord {
            origin: Origin::Edit,
            transaction: Some(transaction),
            kind: mutation.kind(),
            target: mutation.target(),
            forward: mutation.forward.clone(),
            inverse: mutation.inverse.clone(),
            at,
        }))
    }

    /// Drops every record up to and including `id`.
    pub(crate) fn discard_through(&mut self, id: OperationId) -> usize {
        self.store.discard_through(id.0)
    }

    /// Applies the inverse payloads of `transaction`, last operation first.
    pub fn replay_inverse<D: DocumentAdapter + ?Sized>(
        &mut self,
        transaction: &Transaction,
        adapter: &mut D,
        at: Millis,
    ) -> Result<Vec<OperationId>, ReplayError> {
        self.replay(transaction, adapter, ReplayDirection::Undo, at)
    }

    /// Applies the forward payloads of `transaction` in order.
    pub fn replay_forward<D: DocumentAdapter + ?Sized>(
        &mut self,
        transaction: &Transaction,
        adapter: &mut D,
        at: Millis,
    ) -> Result<Vec<OperationId>, ReplayError> {
        self.replay(transaction, adapter, ReplayDirection::Redo, at)
    }

    /// All-or-nothing replay. If any payload fails, the ones already applied
    /// are reversed and nothing is written to the log.
    fn replay<D: DocumentAdapter + ?Sized>(
        &mut self,
        transaction: &Transaction,
        adapter: &mut D,
        direction: ReplayDirection,
        at: Millis,
    ) -> Result<Vec<OperationId>, ReplayError> {
        let steps: Vec<&Operation> = match direction {
            ReplayDirection::Undo => transaction.operations.iter().rev().collect(),
            ReplayDirection::Redo => transaction.operations.iter().collect(),
        };

        let mut applied: Vec<(&Payload, Payload)> = Vec::with_capacity(steps.len());
        for op in steps {
            let payload = match direction {
                ReplayDirection::Undo => &op.inverse,
                ReplayDirection::Redo => &op.forward,
            };
            match adapter.apply(payload) {
                Ok(reverse) => applied.push((payload, reverse)),
                Err(source) => {
                    rollback(adapter, &applied);
                    return Err(ReplayError {
                        transaction: transaction.id,
                        direction,
                        operation: op.id,
                        source,
                    });
                }
            }
        }

        let ids = applied
            .into_iter()
            .map(|(payload, reverse)| {
                OperationId(self.store.append(LogRecord {
                    origin: Origin::HistoryReplay,
                    transaction: None,
                    kind: payload.kind(),
                    target: payload.target(),
                    forward: payload.clone(),
                    inverse: reverse,
                    at,
                }))
            })
            .collect();
        Ok(ids)
    }
}

fn rollback<D: DocumentAdapter + ?Sized>(adapter: &mut D, applied: &[(&Payload, Payload)]) {
    for (payload, reverse) in applied.iter().rev() {
        if let Err(err) = adapter.apply(reverse) {
            tracing::warn!(
                entity = %payload.target(),
                error = %err,
                "rollback step failed; document may be inconsistent"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::BlockDocument;
    use crate::error::ApplyError;
    use crate::operation::Block;
    use blockdoc_crdt::LinearLog;

    fn insert(index: usize, id: &str) -> Mutation {
        Mutation::new(
            Payload::InsertBlock {
                index,
                block: Block::paragraph(id, id),
            },
            Payload::RemoveBlock {
                index,
                id: id.into(),
            },
        )
    }

    /// Applies `mutations` to `doc` and captures them into one transaction.
    fn capture<S: OpStore<LogRecord>>(
        log: &mut OperationLog<S>,
        doc: &mut BlockDocument,
        mutations: &[Mutation],
    ) -> Transaction {
        let mut tx = Transaction::open(TransactionId(1), 0);
        for m in mutations {
            doc.apply(&m.forward).unwrap();
            let id = log.record(m, tx.id, 0);
            tx.push(m, 0, || id);
        }
        tx.close(0);
        tx
    }

    #[test]
    fn replay_inverse_then_forward() {
        let mut log = OperationLog::default();
        let mut doc = BlockDocument::new();
        let tx = capture(&mut log, &mut doc, &[insert(0, "A"), insert(1, "B")]);
        assert_eq!(log.len(), 2);

        let undo_ids = log.replay_inverse(&tx, &mut doc, 10).unwrap();
        assert!(doc.is_empty());
        assert_eq!(undo_ids.len(), 2);
        let first = log.get(undo_ids[0]).unwrap();
        assert_eq!(first.origin, Origin::HistoryReplay);
        assert_eq!(first.transaction, None);
        // Reverse order: "B" is removed first.
        assert_eq!(first.target.block.as_str(), "B");

        log.replay_forward(&tx, &mut doc, 20).unwrap();
        assert_eq!(doc.texts(), vec!["A", "B"]);
        assert_eq!(log.len(), 6);
    }

    #[test]
    fn failed_replay_rolls_back_and_logs_nothing() {
        let mut log = OperationLog::default();
        let mut doc = BlockDocument::new();
        let tx = capture(&mut log, &mut doc, &[insert(0, "A"), insert(1, "B")]);

        // Outside the history: "X" lands in front and "A" goes away, so the
        // first undo step (remove "B" at 1) succeeds and the second fails.
        doc.apply(&insert(0, "X").forward).unwrap();
        doc.apply(&Payload::RemoveBlock {
            index: 1,
            id: "A".into(),
        })
        .unwrap();
        let before = doc.to_json_string();

        let err = log.replay_inverse(&tx, &mut doc, 10).unwrap_err();
        assert_eq!(err.direction, ReplayDirection::Undo);
        assert_eq!(err.transaction, TransactionId(1));
        assert_eq!(err.source, ApplyError::BlockNotFound("A".into()));
        assert_eq!(doc.to_json_string(), before);
        assert_eq!(doc.texts(), vec!["X", "B"]);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn linear_store_is_a_drop_in_replacement() {
        let mut log = OperationLog::new(LinearLog::new(9));
        let mut doc = BlockDocument::new();
        let tx = capture(&mut log, &mut doc, &[insert(0, "A")]);
        log.replay_inverse(&tx, &mut doc, 1).unwrap();
        assert!(doc.is_empty());
        assert_eq!(log.records().count(), 2);
    }

    #[test]
    fn crdt_logs_merge() {
        let mut left = OperationLog::crdt(65_536);
        let mut right = OperationLog::crdt(65_537);
        let mut doc = BlockDocument::new();
        capture(&mut left, &mut doc, &[insert(0, "A")]);
        capture(&mut right, &mut BlockDocument::new(), &[insert(0, "B")]);
        assert_eq!(left.merge(&right), 1);
        assert_eq!(left.merge(&right), 0);
        assert_eq!(left.len(), 2);
    }
}
