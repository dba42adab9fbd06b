//! Logical clocks for the operation log.
//!
//! Every log entry is stamped with a [`Ts`] `(sid, time)`. Entries are totally
//! ordered by time first and session second, which is what makes a merged log
//! look the same no matter which replica it was merged on.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

/// Session IDs. Values below `MIN_USER` are never issued to a writer.
#[allow(non_snake_case)]
pub mod SESSION {
    pub const MIN_USER: u64 = 65_536;
}

// ── Ts ─────────────────────────────────────────────────────────────────────

/// An immutable logical timestamp: `(session_id, logical_time)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ts {
    pub sid: u64,
    pub time: u64,
}

impl Ts {
    pub const fn new(sid: u64, time: u64) -> Self {
        Self { sid, time }
    }
}

impl Ord for Ts {
    fn cmp(&self, other: &Self) -> Ordering {
        self.time
            .cmp(&other.time)
            .then_with(|| self.sid.cmp(&other.sid))
    }
}

impl PartialOrd for Ts {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Ts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.sid.to_string();
        if s.len() > 4 {
            write!(f, "..{}.{}", &s[s.len() - 4..], self.time)
        } else {
            write!(f, "{}.{}", s, self.time)
        }
    }
}

// ── ClockVector ────────────────────────────────────────────────────────────

/// A vector clock: local logical clock plus the latest time seen per peer.
#[derive(Debug, Clone)]
pub struct ClockVector {
    pub sid: u64,
    pub time: u64,
    pub peers: HashMap<u64, Ts>,
}

impl ClockVector {
    pub fn new(sid: u64, time: u64) -> Self {
        Self {
            sid,
            time,
            peers: HashMap::new(),
        }
    }

    /// Returns the current timestamp and advances the clock by `cycles`.
    pub fn tick(&mut self, cycles: u64) -> Ts {
        let stamp = Ts::new(self.sid, self.time);
        self.time += cycles;
        stamp
    }

    /// Advance local time whenever we observe a timestamp with a higher value.
    /// Idempotent: calling multiple times is safe.
    pub fn observe(&mut self, id: Ts, span: u64) {
        if span == 0 {
            return;
        }
        let edge = id.time + span - 1;
        let sid = id.sid;
        if sid != self.sid {
            self.peers
                .entry(sid)
                .and_modify(|e| {
                    if edge > e.time {
                        e.time = edge;
                    }
                })
                .or_insert_with(|| Ts::new(sid, edge));
        }
        if edge >= self.time {
            self.time = edge + 1;
        }
    }
}
