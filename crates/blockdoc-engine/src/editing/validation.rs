use serde::Serialize;

use crate::blocks::FieldError;
use crate::models::BlockId;

/// Problems found in one block
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockIssues {
    pub block: BlockId,
    pub index: usize,
    pub type_id: String,
    pub errors: Vec<FieldError>,
}

/// Outcome of validating a whole document. Only blocks with errors appear.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub blocks: Vec<BlockIssues>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.blocks.iter().map(|b| b.errors.len()).sum()
    }

    pub fn for_block(&self, block: &BlockId) -> Option<&BlockIssues> {
        self.blocks.iter().find(|b| &b.block == block)
    }
}

impl std::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_valid() {
            return write!(f, "document is valid");
        }
        write!(f, "{} validation error(s)", self.error_count())?;
        for issues in &self.blocks {
            for error in &issues.errors {
                write!(
                    f,
                    "\n  block {} [{}] {}: {error}",
                    issues.index, issues.block, issues.type_id
                )?;
            }
        }
        Ok(())
    }
}
