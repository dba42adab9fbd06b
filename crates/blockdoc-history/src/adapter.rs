//! The boundary between the block editor and the history engine.

use serde::{Deserialize, Serialize};

use crate::error::ApplyError;
use crate::operation::{OperationKind, Payload, TargetId};

/// A change the editor already made, described with both directions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mutation {
    pub forward: Payload,
    pub inverse: Payload,
}

impl Mutation {
    pub fn new(forward: Payload, inverse: Payload) -> Self {
        Self { forward, inverse }
    }

    pub fn kind(&self) -> OperationKind {
        self.forward.kind()
    }

    pub fn target(&self) -> TargetId {
        self.forward.target()
    }
}

/// Applies payloads to the live document.
///
/// This is the only way the engine touches the document, for edits and for
/// undo/redo replay alike.
pub trait DocumentAdapter {
    /// Applies `payload` and returns the payload that exactly reverses it,
    /// computed from the state before the change.
    ///
    /// On error the document must be left untouched.
    fn apply(&mut self, payload: &Payload) -> Result<Payload, ApplyError>;
}

impl<A: DocumentAdapter + ?Sized> DocumentAdapter for Box<A> {
    fn apply(&mut self, payload: &Payload) -> Result<Payload, ApplyError> {
        (**self).apply(payload)
    }
}
