//! The append-only op-log contract.

use crate::clock::Ts;

/// An append-only, causally ordered store of log entries.
///
/// The history engine only talks to its log through this trait, so a
/// CRDT-backed [`CrdtLog`](crate::CrdtLog) and a plain
/// [`LinearLog`](crate::LinearLog) are interchangeable underneath it.
pub trait OpStore<T> {
    /// Appends `data` and returns the timestamp assigned to it. Timestamps
    /// returned by successive calls are strictly increasing.
    fn append(&mut self, data: T) -> Ts;

    /// Looks up an entry by the timestamp [`append`](OpStore::append) returned.
    fn get(&self, id: Ts) -> Option<&T>;

    /// Number of retained entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Timestamp of the most recent entry, if any.
    fn last_id(&self) -> Option<Ts>;

    /// Retained entries in log order.
    fn entries(&self) -> Box<dyn Iterator<Item = (Ts, &T)> + '_>;

    /// Drops every entry at or before `id`. Returns how many were dropped.
    fn discard_through(&mut self, id: Ts) -> usize;
}
