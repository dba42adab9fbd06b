//! In-memory block document.
//!
//! A flat, ordered list of [`Block`]s. It implements [`DocumentAdapter`] and
//! checks every payload against the current state before touching anything,
//! so a stale payload fails cleanly instead of corrupting the document.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::adapter::DocumentAdapter;
use crate::error::ApplyError;
use crate::operation::{char_len, Block, BlockId, Payload};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockDocument {
    pub blocks: Vec<Block>,
}

impl BlockDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn block(&self, id: &BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| &b.id == id)
    }

    pub fn index_of(&self, id: &BlockId) -> Option<usize> {
        self.blocks.iter().position(|b| &b.id == id)
    }

    /// The `text` field of every block, in order. Blocks without one yield
    /// an empty string.
    pub fn texts(&self) -> Vec<String> {
        self.blocks
            .iter()
            .map(|b| {
                b.data
                    .get("text")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string()
            })
            .collect()
    }

    /// Serialized form, used to compare document states exactly.
    pub fn to_json_string(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    fn expect_at(&self, index: usize, id: &BlockId) -> Result<(), ApplyError> {
        let actual = self
            .index_of(id)
            .ok_or_else(|| ApplyError::BlockNotFound(id.clone()))?;
        if actual != index {
            return Err(ApplyError::PositionMismatch {
                block: id.clone(),
                expected: index,
                actual,
            });
        }
        Ok(())
    }

    fn text_mut(&mut self, id: &BlockId, field: &str) -> Result<&mut String, ApplyError> {
        let block = self
            .blocks
            .iter_mut()
            .find(|b| &b.id == id)
            .ok_or_else(|| ApplyError::BlockNotFound(id.clone()))?;
        match block.data.get_mut(field) {
            Some(Value::String(text)) => Ok(text),
            _ => Err(ApplyError::FieldNotText {
                block: id.clone(),
                field: field.to_string(),
            }),
        }
    }
}

fn byte_offset(text: &str, offset: usize) -> Result<usize, ApplyError> {
    if offset == char_len(text) {
        return Ok(text.len());
    }
    text.char_indices()
        .nth(offset)
        .map(|(i, _)| i)
        .ok_or(ApplyError::OffsetOutOfRange {
            offset,
            len: char_len(text),
        })
}

impl DocumentAdapter for BlockDocument {
    fn apply(&mut self, payload: &Payload) -> Result<Payload, ApplyError> {
        match payload {
            Payload::InsertBlock { index, block } => {
                if *index > self.blocks.len() {
                    return Err(ApplyError::IndexOutOfRange {
                        index: *index,
                        len: self.blocks.len(),
                    });
                }
                if self.index_of(&block.id).is_some() {
                    return Err(ApplyError::DuplicateBlock(block.id.clone()));
                }
                self.blocks.insert(*index, block.clone());
                Ok(Payload::RemoveBlock {
                    index: *index,
                    id: block.id.clone(),
                })
            }
            Payload::RemoveBlock { index, id } => {
                self.expect_at(*index, id)?;
                let block = self.blocks.remove(*index);
                Ok(Payload::InsertBlock {
                    index: *index,
                    block,
                })
            }
            Payload::SetData { id, data } => {
                let index = self
                    .index_of(id)
                    .ok_or_else(|| ApplyError::BlockNotFound(id.clone()))?;
                let previous = std::mem::replace(&mut self.blocks[index].data, data.clone());
                Ok(Payload::SetData {
                    id: id.clone(),
                    data: previous,
                })
            }
            Payload::InsertText {
                id,
                field,
                offset,
                text,
            } => {
                let current = self.text_mut(id, field)?;
                let at = byte_offset(current, *offset)?;
                current.insert_str(at, text);
                Ok(Payload::DeleteText {
                    id: id.clone(),
                    field: field.clone(),
                    offset: *offset,
                    text: text.clone(),
                })
            }
            Payload::DeleteText {
                id,
                field,
                offset,
                text,
            } => {
                let current = self.text_mut(id, field)?;
                let start = byte_offset(current, *offset)?;
                if !current[start..].starts_with(text.as_str()) {
                    return Err(ApplyError::TextMismatch {
                        block: id.clone(),
                        offset: *offset,
                        expected: text.clone(),
                    });
                }
                current.replace_range(start..start + text.len(), "");
                Ok(Payload::InsertText {
                    id: id.clone(),
                    field: field.clone(),
                    offset: *offset,
                    text: text.clone(),
                })
            }
            Payload::MoveBlock { id, from, to } => {
                self.expect_at(*from, id)?;
                if *to >= self.blocks.len() {
                    return Err(ApplyError::IndexOutOfRange {
                        index: *to,
                        len: self.blocks.len(),
                    });
                }
                let block = self.blocks.remove(*from);
                self.blocks.insert(*to, block);
                Ok(Payload::MoveBlock {
                    id: id.clone(),
                    from: *to,
                    to: *from,
                })
            }
        }
    }
}
