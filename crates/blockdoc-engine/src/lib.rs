pub mod blocks;
pub mod editing;
pub mod gateway;
pub mod models;
pub mod render;
pub mod session;
pub mod wire;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use blocks::{BlockData, BlockError, BlockKind, FieldError, SchemaRegistry, UnknownBlockType};
pub use editing::{Cmd, Document, EditError, Patch, ValidationReport};
pub use gateway::{FileGateway, GatewayError, MemoryGateway, PersistenceGateway};
pub use models::{Block, BlockId, DocumentId, InvalidDocumentId};
pub use render::{Converter, EscapeAll, Sanitize};
pub use session::{
    EditorSession, Notification, SaveOutcome, SessionError, SessionOptions, SessionState,
};
pub use wire::{DeserializationError, IssueKind, LoadIssue, Loaded};
