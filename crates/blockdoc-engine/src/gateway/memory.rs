use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use super::{GatewayError, GatewayResult, PersistenceGateway, check_version, envelope_version};
use crate::models::DocumentId;

/// In-process store. Contents are lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    documents: RwLock<HashMap<DocumentId, String>>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store without a version check
    pub fn with_document(self, id: DocumentId, payload: impl Into<String>) -> Self {
        if let Ok(mut documents) = self.documents.write() {
            documents.insert(id, payload.into());
        }
        self
    }

    pub fn len(&self) -> usize {
        self.documents.read().map(|d| d.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: T) -> GatewayError {
    GatewayError::Unavailable("lock poisoned".to_string())
}

#[async_trait]
impl PersistenceGateway for MemoryGateway {
    async fn save(&self, id: &DocumentId, payload: &str) -> GatewayResult<()> {
        let attempted = envelope_version(payload)?;
        let mut documents = self.documents.write().map_err(poisoned)?;
        let stored = documents
            .get(id)
            .map(|existing| envelope_version(existing))
            .transpose()?;
        check_version(stored, attempted)?;
        documents.insert(id.clone(), payload.to_string());
        Ok(())
    }

    async fn load(&self, id: &DocumentId) -> GatewayResult<String> {
        let documents = self.documents.read().map_err(poisoned)?;
        documents
            .get(id)
            .cloned()
            .ok_or_else(|| GatewayError::NotFound(id.clone()))
    }
}
