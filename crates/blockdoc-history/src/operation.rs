//! Operations: the atomic unit of change.

use std::fmt;

use blockdoc_crdt::Ts;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::time::Millis;

// ── Identifiers ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(pub String);

impl BlockId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Log timestamp of the first mutation folded into an operation. Unique and
/// totally ordered within a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OperationId(pub Ts);

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TransactionId(pub u64);

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tx{}", self.0)
    }
}

// ── Blocks and payloads ────────────────────────────────────────────────────

/// One editor block: an id, the tool that renders it, and its data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    #[serde(rename = "type")]
    pub tool: String,
    pub data: Value,
}

impl Block {
    pub fn new(id: impl Into<String>, tool: impl Into<String>, data: Value) -> Self {
        Self {
            id: BlockId::new(id),
            tool: tool.into(),
            data,
        }
    }

    /// A paragraph block holding `text`.
    pub fn paragraph(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(id, "paragraph", serde_json::json!({ "text": text.into() }))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Insert,
    Delete,
    Update,
    Move,
}

/// Entity an operation touches: a block, or one field of a block.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetId {
    pub block: BlockId,
    pub field: Option<String>,
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(f, "{}.{}", self.block, field),
            None => write!(f, "{}", self.block),
        }
    }
}

/// Self-contained description of one document change. Text offsets count
/// characters, not bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Payload {
    InsertBlock {
        index: usize,
        block: Block,
    },
    RemoveBlock {
        index: usize,
        id: BlockId,
    },
    SetData {
        id: BlockId,
        data: Value,
    },
    InsertText {
        id: BlockId,
        field: String,
        offset: usize,
        text: String,
    },
    DeleteText {
        id: BlockId,
        field: String,
        offset: usize,
        text: String,
    },
    MoveBlock {
        id: BlockId,
        from: usize,
        to: usize,
    },
}

impl Payload {
    pub fn kind(&self) -> OperationKind {
        match self {
            Payload::InsertBlock { .. } | Payload::InsertText { .. } => OperationKind::Insert,
            Payload::RemoveBlock { .. } | Payload::DeleteText { .. } => OperationKind::Delete,
            Payload::SetData { .. } => OperationKind::Update,
            Payload::MoveBlock { .. } => OperationKind::Move,
        }
    }

    pub fn target(&self) -> TargetId {
        match self {
            Payload::InsertBlock { block, .. } => TargetId {
                block: block.id.clone(),
                field: None,
            },
            Payload::RemoveBlock { id, .. }
            | Payload::SetData { id, .. }
            | Payload::MoveBlock { id, .. } => TargetId {
                block: id.clone(),
                field: None,
            },
            Payload::InsertText { id, field, .. } | Payload::DeleteText { id, field, .. } => {
                TargetId {
                    block: id.clone(),
                    field: Some(field.clone()),
                }
            }
        }
    }
}

pub(crate) fn char_len(s: &str) -> usize {
    s.chars().count()
}

// ── Operation ──────────────────────────────────────────────────────────────

/// Where an operation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Origin {
    #[serde(rename = "edit")]
    Edit,
    #[serde(rename = "history-replay")]
    HistoryReplay,
}

impl Origin {
    pub fn as_str(self) -> &'static str {
        match self {
            Origin::Edit => "edit",
            Origin::HistoryReplay => "history-replay",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub id: OperationId,
    pub kind: OperationKind,
    pub target: TargetId,
    pub forward: Payload,
    pub inverse: Payload,
    pub transaction_id: TransactionId,
    pub origin_timestamp: Millis,
}

impl Operation {
    /// Folds an adjacent edit into this operation when both touch the same
    /// target with the same kind and the edit continues where this one ended.
    ///
    /// Returns `false` and leaves `self` untouched when the edits do not chain.
    pub(crate) fn coalesce(&mut self, forward: &Payload) -> bool {
        if forward.kind() != self.kind || forward.target() != self.target {
            return false;
        }
        match (&mut self.forward, forward) {
            (
                Payload::InsertText {
                    id, field, offset, text,
                },
                Payload::InsertText {
                    offset: next_offset,
                    text: next_text,
                    ..
                },
            ) if *next_offset == *offset + char_len(text) => {
                text.push_str(next_text);
                self.inverse = Payload::DeleteText {
                    id: id.clone(),
                    field: field.clone(),
                    offset: *offset,
                    text: text.clone(),
                };
                true
            }
            (
                Payload::DeleteText {
                    id, field, offset, text,
                },
                Payload::DeleteText {
                    offset: next_offset,
                    text: next_text,
                    ..
                },
            ) => {
                if *next_offset + char_len(next_text) == *offset {
                    // Backspace run: the new text sits in front.
                    *offset = *next_offset;
                    text.insert_str(0, next_text);
                } else if *next_offset == *offset {
                    // Forward-delete run: the caret stays put.
                    text.push_str(next_text);
                } else {
                    return false;
                }
                self.inverse = Payload::InsertText {
                    id: id.clone(),
                    field: field.clone(),
                    offset: *offset,
                    text: text.clone(),
                };
                true
            }
            (Payload::SetData { data, .. }, Payload::SetData { data: next, .. }) => {
                // The original inverse still restores the pre-run state.
                *data = next.clone();
                true
            }
            _ => false,
        }
    }
}
