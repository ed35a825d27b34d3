//! Messages exchanged with the remote source of truth.
//!
//! Outbound actions are fire-and-forget: the engine never waits for an
//! acknowledgement. Inbound frames are the only mutation path that does not
//! go through the command stack.

use serde::{Deserialize, Serialize};

use crate::annotation::{Annotation, AnnotationId};
use crate::error::AnnotationResult;

/// One outbound action, mirrored from a command-stack operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum WireAction {
    Add { annotation: Annotation },
    Remove { id: AnnotationId },
    Update { annotation: Annotation },
}

impl WireAction {
    #[must_use]
    pub fn id(&self) -> &AnnotationId {
        match self {
            Self::Add { annotation } | Self::Update { annotation } => annotation.id(),
            Self::Remove { id } => id,
        }
    }

    pub fn to_json(&self) -> AnnotationResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// One-way outbound channel. Implementations must not block.
pub trait ActionSink {
    fn send(&mut self, action: WireAction);
}

impl<F: FnMut(WireAction)> ActionSink for F {
    fn send(&mut self, action: WireAction) {
        self(action);
    }
}

/// Queue of outbound actions drained by the host's transport.
#[derive(Debug, Clone, Default)]
pub struct ActionBuffer {
    pending: Vec<WireAction>,
}

impl ActionBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn pending(&self) -> &[WireAction] {
        &self.pending
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn drain(&mut self) -> Vec<WireAction> {
        std::mem::take(&mut self.pending)
    }
}

impl ActionSink for ActionBuffer {
    fn send(&mut self, action: WireAction) {
        self.pending.push(action);
    }
}

/// Authoritative state pushed by the remote peer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RemoteFrame {
    /// Full replacement of the local store.
    SetAll { annotations: Vec<Annotation> },
    /// Upsert of a single annotation by id.
    Confirm { annotation: Annotation },
}

impl RemoteFrame {
    pub fn from_json(text: &str) -> AnnotationResult<Self> {
        Ok(serde_json::from_str(text)?)
    }
}
