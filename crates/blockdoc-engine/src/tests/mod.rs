//! Shared fixtures for unit tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::blocks::SchemaRegistry;
use crate::gateway::{GatewayError, GatewayResult, MemoryGateway, PersistenceGateway};
use crate::models::DocumentId;
use crate::render::Converter;

/// Memory-backed gateway that counts writes and can be slowed down or
/// made to fail.
#[derive(Debug, Default)]
pub struct RecordingGateway {
    inner: MemoryGateway,
    delay: Option<Duration>,
    fail: AtomicBool,
    saves: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn with_document(mut self, id: &str, payload: &str) -> Self {
        self.inner = self.inner.with_document(doc_id(id), payload);
        self
    }

    pub fn fail_saves(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Number of save calls that reached the gateway
    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub async fn stored(&self, id: &str) -> Option<String> {
        self.inner.load(&doc_id(id)).await.ok()
    }
}

#[async_trait]
impl PersistenceGateway for RecordingGateway {
    async fn save(&self, id: &DocumentId, payload: &str) -> GatewayResult<()> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let result = if self.fail.load(Ordering::SeqCst) {
            Err(GatewayError::Unavailable("store offline".to_string()))
        } else {
            self.inner.save(id, payload).await
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }

    async fn load(&self, id: &DocumentId) -> GatewayResult<String> {
        self.inner.load(id).await
    }
}

pub fn doc_id(id: &str) -> DocumentId {
    DocumentId::parse(id).expect("valid test document id")
}

pub fn registry() -> Arc<SchemaRegistry> {
    Arc::new(SchemaRegistry::standard())
}

pub fn converter() -> Converter {
    Converter::escaping(registry())
}

/// Build an update patch from a `json!` object
pub fn patch(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("patch must be a JSON object, got {other}"),
    }
}
