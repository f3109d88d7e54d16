use crate::models::BlockId;

/// Result of applying a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    pub block: BlockId,
    /// Where the block now sits; `None` once removed
    pub index: Option<usize>,
}
