//! Storage boundary for serialized documents.
//!
//! The engine hands a gateway the canonical wire text and gets it back on
//! load; it never sees how or where documents are kept. Both reference
//! gateways refuse a write whose envelope `version` is not newer than the
//! stored one, so a stale session cannot silently overwrite a newer save.

mod file;
mod memory;

pub use file::FileGateway;
pub use memory::MemoryGateway;

use async_trait::async_trait;

use crate::models::DocumentId;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("document not found: {0}")]
    NotFound(DocumentId),

    #[error("version conflict: stored {stored}, attempted {attempted}")]
    Conflict { stored: u64, attempted: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("payload is not a document envelope: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// Store the whole document, replacing any previous copy
    async fn save(&self, id: &DocumentId, payload: &str) -> GatewayResult<()>;

    async fn load(&self, id: &DocumentId) -> GatewayResult<String>;
}

/// Read the `version` field of a serialized envelope
pub(crate) fn envelope_version(payload: &str) -> GatewayResult<u64> {
    #[derive(serde::Deserialize)]
    struct Versioned {
        #[serde(default)]
        version: u64,
    }
    Ok(serde_json::from_str::<Versioned>(payload)?.version)
}

/// Refuse writes that would not move the stored version forward
pub(crate) fn check_version(stored: Option<u64>, attempted: u64) -> GatewayResult<()> {
    match stored {
        Some(stored) if attempted <= stored => Err(GatewayError::Conflict { stored, attempted }),
        _ => Ok(()),
    }
}
