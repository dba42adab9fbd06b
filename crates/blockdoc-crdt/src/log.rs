//! Append-only operation logs.
//!
//! # Overview
//!
//! A [`CrdtLog`] stores entries in a [`BTreeMap`] keyed by their logical
//! timestamp. Each entry also records the entry that was the log head when it
//! was appended (its causal parent). Because the key order is total and entries
//! are never mutated once written, merging two logs is a plain union:
//!
//! - merging `b` into `a` and `a` into `b` yields the same entry set
//!   (commutative);
//! - merging the same log twice is a no-op (idempotent).
//!
//! [`LinearLog`] keeps the same contract with a `Vec` and a counter. It cannot
//! merge, which is fine for a single writer.

use std::collections::BTreeMap;

use crate::clock::{ClockVector, Ts};
use crate::store::OpStore;

/// Key used in the entry `BTreeMap`: orders by `(time, sid)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct EntryKey {
    pub time: u64,
    pub sid: u64,
}

impl EntryKey {
    pub fn from_ts(ts: Ts) -> Self {
        Self {
            time: ts.time,
            sid: ts.sid,
        }
    }

    pub fn ts(self) -> Ts {
        Ts::new(self.sid, self.time)
    }
}

/// One immutable log entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry<T> {
    pub id: Ts,
    /// Log head at the time this entry was appended.
    pub parent: Option<Ts>,
    pub data: T,
}

// ── CrdtLog ────────────────────────────────────────────────────────────────

/// CRDT-backed append-only log.
#[derive(Debug, Clone)]
pub struct CrdtLog<T> {
    clock: ClockVector,
    entries: BTreeMap<EntryKey, Entry<T>>,
    /// Everything at or before this key has been compacted away.
    baseline: Option<EntryKey>,
}

impl<T> CrdtLog<T> {
    /// Creates an empty log whose local writer uses session `sid`.
    pub fn new(sid: u64) -> Self {
        Self {
            clock: ClockVector::new(sid, 1),
            entries: BTreeMap::new(),
            baseline: None,
        }
    }

    pub fn sid(&self) -> u64 {
        self.clock.sid
    }

    pub fn clock(&self) -> &ClockVector {
        &self.clock
    }

    /// Returns the full entry (with its causal parent) for `id`.
    pub fn entry(&self, id: Ts) -> Option<&Entry<T>> {
        self.entries.get(&EntryKey::from_ts(id))
    }

    /// Latest entry in log order.
    pub fn head(&self) -> Option<&Entry<T>> {
        self.entries.values().next_back()
    }

    /// Compaction point, if the log has been advanced.
    pub fn baseline(&self) -> Option<Ts> {
        self.baseline.map(EntryKey::ts)
    }

    /// Advances the baseline to `ts` (inclusive), dropping every entry up to
    /// and including it. Entries at or before the baseline that arrive later
    /// through [`merge`](CrdtLog::merge) are ignored.
    pub fn advance_to(&mut self, ts: Ts) -> usize {
        let key = EntryKey::from_ts(ts);
        let keep = self.entries.split_off(&EntryKey {
            time: key.time,
            sid: key.sid.saturating_add(1),
        });
        let dropped = std::mem::replace(&mut self.entries, keep).len();
        self.baseline = Some(match self.baseline {
            Some(prev) if prev > key => prev,
            _ => key,
        });
        tracing::trace!(baseline = %ts, dropped, "op log advanced");
        dropped
    }

    fn is_compacted(&self, key: &EntryKey) -> bool {
        self.baseline.is_some_and(|b| *key <= b)
    }
}

impl<T: Clone> CrdtLog<T> {
    /// Merges every entry of `other` into this log.
    ///
    /// Returns the number of entries that were new to this log.
    pub fn merge(&mut self, other: &CrdtLog<T>) -> usize {
        let mut merged = 0;
        for (key, entry) in &other.entries {
            if self.is_compacted(key) || self.entries.contains_key(key) {
                continue;
            }
            self.clock.observe(entry.id, 1);
            self.entries.insert(*key, entry.clone());
            merged += 1;
        }
        if merged > 0 {
            tracing::debug!(merged, sid = self.clock.sid, "op log merged");
        }
        merged
    }
}

impl<T> OpStore<T> for CrdtLog<T> {
    fn append(&mut self, data: T) -> Ts {
        let parent = self.head().map(|e| e.id);
        let id = self.clock.tick(1);
        self.entries
            .insert(EntryKey::from_ts(id), Entry { id, parent, data });
        id
    }

    fn get(&self, id: Ts) -> Option<&T> {
        self.entry(id).map(|e| &e.data)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn last_id(&self) -> Option<Ts> {
        self.head().map(|e| e.id)
    }

    fn entries(&self) -> Box<dyn Iterator<Item = (Ts, &T)> + '_> {
        Box::new(self.entries.values().map(|e| (e.id, &e.data)))
    }

    fn discard_through(&mut self, id: Ts) -> usize {
        self.advance_to(id)
    }
}

// ── LinearLog ──────────────────────────────────────────────────────────────

/// Vector-backed log for a single writer. No merge support.
#[derive(Debug, Clone)]
pub struct LinearLog<T> {
    sid: u64,
    next_time: u64,
    entries: Vec<(Ts, T)>,
}

impl<T> LinearLog<T> {
    pub fn new(sid: u64) -> Self {
        Self {
            sid,
            next_time: 1,
            entries: Vec::new(),
        }
    }
}

impl<T> OpStore<T> for LinearLog<T> {
    fn append(&mut self, data: T) -> Ts {
        let id = Ts::new(self.sid, self.next_time);
        self.next_time += 1;
        self.entries.push((id, data));
        id
    }

    fn get(&self, id: Ts) -> Option<&T> {
        // Entries are sorted by construction.
        self.entries
            .binary_search_by(|(e, _)| e.cmp(&id))
            .ok()
            .map(|i| &self.entries[i].1)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn last_id(&self) -> Option<Ts> {
        self.entries.last().map(|(id, _)| *id)
    }

    fn entries(&self) -> Box<dyn Iterator<Item = (Ts, &T)> + '_> {
        Box::new(self.entries.iter().map(|(id, data)| (*id, data)))
    }

    fn discard_through(&mut self, id: Ts) -> usize {
        let before = self.entries.len();
        self.entries.retain(|(e, _)| *e > id);
        before - self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_assigns_increasing_ids_and_parents() {
        let mut log = CrdtLog::new(100);
        let a = log.append("a");
        let b = log.append("b");
        assert!(a < b);
        assert_eq!(log.entry(a).map(|e| e.parent), Some(None));
        assert_eq!(log.entry(b).map(|e| e.parent), Some(Some(a)));
        assert_eq!(log.last_id(), Some(b));
        assert_eq!(log.get(a), Some(&"a"));
    }

    #[test]
    fn merge_is_union() {
        let mut left = CrdtLog::new(100);
        let mut right = CrdtLog::new(200);
        left.append(1);
        right.append(2);
        right.append(3);
        assert_eq!(left.merge(&right), 2);
        assert_eq!(left.len(), 3);
        assert_eq!(left.merge(&right), 0);
        // Local clock moved past everything observed.
        let next = left.append(4);
        assert!(next > right.last_id().unwrap());
    }

    #[test]
    fn advance_to_drops_prefix_and_blocks_remerge() {
        let mut log = CrdtLog::new(100);
        let a = log.append('a');
        let b = log.append('b');
        let c = log.append('c');
        let snapshot = log.clone();
        assert_eq!(log.advance_to(b), 2);
        assert_eq!(log.len(), 1);
        assert_eq!(log.last_id(), Some(c));
        assert_eq!(log.baseline(), Some(b));
        assert_eq!(log.merge(&snapshot), 0);
        assert!(log.get(a).is_none());
    }

    #[test]
    fn linear_log_matches_store_contract() {
        let mut log = LinearLog::new(7);
        let a = log.append("x");
        let b = log.append("y");
        assert_eq!(a, Ts::new(7, 1));
        assert_eq!(b, Ts::new(7, 2));
        assert_eq!(log.get(b), Some(&"y"));
        assert_eq!(log.discard_through(a), 1);
        assert_eq!(log.entries().map(|(id, _)| id).collect::<Vec<_>>(), vec![b]);
    }
}
