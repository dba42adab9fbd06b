//! blockdoc-crdt: causal clock and op-log substrate.
//!
//! Provides the pieces the history engine needs from a CRDT without pulling
//! in a full document model:
//! - [`clock`]: logical timestamps and a vector clock.
//! - [`store`]: the [`OpStore`] contract every op log satisfies.
//! - [`log`]: [`CrdtLog`], an append-only log whose merge is commutative and
//!   idempotent, and [`LinearLog`], a plain vector-backed substitute.

pub mod clock;
pub mod log;
pub mod store;

pub use clock::{ClockVector, Ts, SESSION};
pub use log::{CrdtLog, Entry, EntryKey, LinearLog};
pub use store::OpStore;
