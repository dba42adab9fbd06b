//! blockdoc-history: undo/redo for a block-structured rich-text editor.
//!
//! Every document change flows through a [`History`]:
//! - [`capture`]: the state machine that groups rapid edits into one undo
//!   step, using a pause delay and a debounce cap.
//! - [`transaction`] / [`stack`]: undo steps and the bounded undo/redo stacks.
//! - [`oplog`]: the append-only record of every applied operation, backed by
//!   a `blockdoc_crdt` op store, plus all-or-nothing replay.
//! - [`adapter`] / [`document`]: the seam to the document model and an
//!   in-memory block document implementing it.
//! - [`scope`] / [`shared`]: atomic scopes, sync and async.

pub mod adapter;
pub mod capture;
pub mod config;
pub mod document;
pub mod error;
pub mod events;
pub mod history;
pub mod operation;
pub mod oplog;
pub mod scope;
pub mod shared;
pub mod shortcuts;
pub mod stack;
pub mod time;
pub mod transaction;

pub use adapter::{DocumentAdapter, Mutation};
pub use capture::{BoundaryCause, CaptureController, CaptureState, ScopeExit, TimerKind, TimerToken};
pub use config::{ConfigError, HistoryConfig};
pub use document::BlockDocument;
pub use error::{ApplyError, HistoryError, ReplayError, TimerError};
pub use events::{ChangeEvent, HistoryEvent, ListenerId};
pub use history::{History, HistoryState};
pub use operation::{
    Block, BlockId, Operation, OperationId, OperationKind, Origin, Payload, TargetId,
    TransactionId,
};
pub use oplog::{LogRecord, OperationLog, ReplayDirection};
pub use scope::AtomicScope;
pub use shared::{Command, SharedHistory};
pub use shortcuts::{resolve_shortcut, HistoryCommand, KeyChord, KeyChordError};
pub use stack::UndoRedoStacks;
pub use time::{Clock, ManualClock, Millis, SystemClock};
pub use transaction::Transaction;
