use thiserror::Error;

use crate::operation::{BlockId, OperationId, TransactionId};
use crate::oplog::ReplayDirection;

/// A payload could not be applied to the document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplyError {
    #[error("block {0} not found")]
    BlockNotFound(BlockId),
    #[error("block {0} already exists")]
    DuplicateBlock(BlockId),
    #[error("index {index} out of range for {len} blocks")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("block {block} field {field:?} is not text")]
    FieldNotText { block: BlockId, field: String },
    #[error("offset {offset} out of range for text of length {len}")]
    OffsetOutOfRange { offset: usize, len: usize },
    #[error("block {block} text at {offset} does not match {expected:?}")]
    TextMismatch {
        block: BlockId,
        offset: usize,
        expected: String,
    },
    #[error("block {block} is at index {actual}, expected {expected}")]
    PositionMismatch {
        block: BlockId,
        expected: usize,
        actual: usize,
    },
}

/// A transaction replay aborted; the document was rolled back to the state
/// it had before the replay started.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{direction} of transaction {transaction} failed at operation {operation}: {source}")]
pub struct ReplayError {
    pub transaction: TransactionId,
    pub direction: ReplayDirection,
    pub operation: OperationId,
    #[source]
    pub source: ApplyError,
}

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history has been destroyed")]
    Destroyed,
    #[error("apply failed: {0}")]
    Apply(#[from] ApplyError),
    #[error("replay failed: {0}")]
    ReplayFailed(#[from] ReplayError),
}

/// Capture timer conditions. Only the low-level `fire_timer` API reports
/// these; every other path ignores them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TimerError {
    #[error("timer token is stale")]
    Stale,
    #[error("timer fired before its deadline")]
    Early,
    #[error("timer fired after history was destroyed")]
    Destroyed,
}
