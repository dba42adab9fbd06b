//! Change and lifecycle events, and the listener registry that fans them
//! out. Listeners run synchronously, in registration order.

use std::collections::BTreeMap;

use crate::error::ReplayError;
use crate::operation::{OperationId, Origin, TransactionId};

/// Operations applied to the document in one engine call.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEvent {
    pub origin: Origin,
    pub operations: Vec<OperationId>,
    pub transaction: Option<TransactionId>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum HistoryEvent {
    Changed(ChangeEvent),
    /// A transaction closed and landed on the undo stack.
    Committed {
        transaction: TransactionId,
        operations: usize,
    },
    /// An undo or redo step was dropped; the document is unchanged.
    ReplayFailed(ReplayError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&HistoryEvent)>;

#[derive(Default)]
pub(crate) struct Listeners {
    next_id: u64,
    listeners: BTreeMap<ListenerId, Listener>,
}

impl Listeners {
    pub(crate) fn add(&mut self, listener: Listener) -> ListenerId {
        self.next_id = self.next_id.saturating_add(1);
        let id = ListenerId(self.next_id);
        self.listeners.insert(id, listener);
        id
    }

    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(&id).is_some()
    }

    pub(crate) fn emit(&mut self, event: HistoryEvent) {
        for listener in self.listeners.values_mut() {
            listener(&event);
        }
    }

    pub(crate) fn clear(&mut self) {
        self.listeners.clear();
    }
}
