// Shared by several integration test binaries; not every helper is used by each
#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use blockdoc_engine::gateway::GatewayResult;
use blockdoc_engine::{
    Converter, Document, DocumentId, EditorSession, MemoryGateway, PersistenceGateway,
    SchemaRegistry, SessionOptions,
};
use serde_json::{Map, Value};

/// Gateway that takes a while to answer and counts overlapping writes
#[derive(Debug)]
pub struct SlowGateway {
    inner: MemoryGateway,
    delay: Duration,
    pub writes: AtomicUsize,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl SlowGateway {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: MemoryGateway::new(),
            delay,
            writes: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PersistenceGateway for SlowGateway {
    async fn save(&self, id: &DocumentId, payload: &str) -> GatewayResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        let result = self.inner.save(id, payload).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }

    async fn load(&self, id: &DocumentId) -> GatewayResult<String> {
        self.inner.load(id).await
    }
}

pub fn registry() -> Arc<SchemaRegistry> {
    Arc::new(SchemaRegistry::standard())
}

pub fn doc_id(id: &str) -> DocumentId {
    DocumentId::parse(id).unwrap()
}

pub fn spawn_session(
    gateway: Arc<dyn PersistenceGateway>,
    autosave: Option<Duration>,
) -> EditorSession {
    let registry = registry();
    EditorSession::spawn(
        Document::new(doc_id("handbook")),
        registry.clone(),
        gateway,
        Converter::escaping(registry),
        SessionOptions {
            autosave_interval: autosave,
            ..SessionOptions::default()
        },
    )
}

pub fn patch(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap()
}
