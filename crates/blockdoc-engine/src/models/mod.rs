pub mod block;
pub mod ids;

pub use block::Block;
pub use ids::{BlockId, DocumentId, InvalidDocumentId};
