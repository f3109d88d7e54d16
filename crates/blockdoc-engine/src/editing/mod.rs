/*!
 * # Editing
 *
 * All document mutations are expressed as [`Cmd`] values and applied through
 * [`Document::apply`], which returns a [`Patch`] describing what moved. The
 * convenience methods on [`Document`] are thin wrappers over `apply`, and the
 * editor session forwards commands unchanged, so there is exactly one code
 * path that changes a document.
 *
 * Edits never validate. A block may sit in an invalid state for as long as
 * the author likes; [`Document::validate`] gathers every problem in one pass
 * and it is the save path that refuses invalid documents.
 */

pub mod commands;
pub mod document;
pub mod patch;
pub mod validation;

pub use commands::Cmd;
pub use document::Document;
pub use patch::Patch;
pub use validation::{BlockIssues, ValidationReport};

use crate::blocks::BlockError;
use crate::models::BlockId;

#[derive(Debug, thiserror::Error)]
pub enum EditError {
    #[error("block not found: {0}")]
    BlockNotFound(BlockId),

    #[error(transparent)]
    Block(#[from] BlockError),
}
