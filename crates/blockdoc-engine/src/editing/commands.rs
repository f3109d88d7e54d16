use serde_json::{Map, Value};

use crate::models::BlockId;

/// A single edit to a document's block sequence
#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    /// Insert a default block of `type_id` at `at`, or at the end when `None`.
    /// Indexes past the end are clamped.
    InsertBlock { type_id: String, at: Option<usize> },
    RemoveBlock { block: BlockId },
    /// Move a block so it ends up at index `to` (clamped to the last slot)
    MoveBlock { block: BlockId, to: usize },
    /// Field-level merge into the block's payload
    UpdateBlock {
        block: BlockId,
        patch: Map<String, Value>,
    },
}

impl Cmd {
    /// Block the command targets, if it already exists
    pub fn target(&self) -> Option<&BlockId> {
        match self {
            Cmd::InsertBlock { .. } => None,
            Cmd::RemoveBlock { block }
            | Cmd::MoveBlock { block, .. }
            | Cmd::UpdateBlock { block, .. } => Some(block),
        }
    }
}
