//! Transactions: one undo step each.

use crate::adapter::Mutation;
use crate::operation::{Operation, OperationId, TransactionId};
use crate::time::Millis;

/// An ordered group of operations. Open while `closed_at` is `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: TransactionId,
    pub operations: Vec<Operation>,
    pub opened_at: Millis,
    pub closed_at: Option<Millis>,
}

impl Transaction {
    pub fn open(id: TransactionId, at: Millis) -> Self {
        Self {
            id,
            operations: Vec::new(),
            opened_at: at,
            closed_at: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Closes the transaction. Closing twice keeps the first close time.
    pub fn close(&mut self, at: Millis) {
        if self.closed_at.is_none() {
            self.closed_at = Some(at);
        }
    }

    /// Oldest operation id, used to find how much of the log is still
    /// referenced.
    pub fn first_operation_id(&self) -> Option<OperationId> {
        self.operations.iter().map(|op| op.id).min()
    }

    /// Adds a mutation, folding it into the last operation when the two
    /// chain. Returns the id of the operation that now holds it.
    ///
    /// `assign_id` is only called when a new operation is created.
    pub(crate) fn push(
        &mut self,
        mutation: &Mutation,
        at: Millis,
        assign_id: impl FnOnce() -> OperationId,
    ) -> OperationId {
        if let Some(last) = self.operations.last_mut() {
            if last.coalesce(&mutation.forward) {
                return last.id;
            }
        }
        let id = assign_id();
        self.operations.push(Operation {
            id,
            kind: mutation.kind(),
            target: mutation.target(),
            forward: mutation.forward.clone(),
            inverse: mutation.inverse.clone(),
            transaction_id: self.id,
            origin_timestamp: at,
        });
        id
    }
}
