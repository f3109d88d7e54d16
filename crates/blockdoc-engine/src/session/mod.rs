/*!
 * # Editor Session
 *
 * One session owns one in-memory document. The document lives inside a
 * single tokio task (the actor); callers hold a cloneable [`EditorSession`]
 * handle and talk to it over one command queue, so edits, saves, loads and
 * autosave ticks are serialized without locks.
 *
 * ```text
 *   EditorSession (Clone)        mpsc        SessionActor (tokio task)
 *   ┌──────────────────┐   ─────────────▶   ┌─────────────────────────┐
 *   │ .update_block()  │                    │ Document + state        │
 *   │ .save()          │   ◀─────────────   │ autosave interval       │
 *   │ .subscribe()     │      oneshot       │ gateway write (spawned) │
 *   └──────────────────┘                    └─────────────────────────┘
 * ```
 *
 * The gateway write runs in its own task and reports back through a second
 * channel, so the session keeps accepting edits while a save is pending. At
 * most one write is in flight; save requests arriving meanwhile are folded
 * into a single retry once it settles.
 */

mod actor;

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value};
use tokio::sync::{broadcast, mpsc, oneshot};

use crate::blocks::SchemaRegistry;
use crate::editing::{Cmd, Document, EditError, Patch, ValidationReport};
use crate::gateway::{GatewayError, PersistenceGateway};
use crate::models::{BlockId, DocumentId};
use crate::render::Converter;
use crate::wire::{DeserializationError, LoadIssue};

use actor::{Command, SessionActor};

pub const DEFAULT_AUTOSAVE_INTERVAL: Duration = Duration::from_secs(30);
pub const DEFAULT_NOTIFICATION_TTL: Duration = Duration::from_secs(5);

const NOTIFICATION_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    /// Period of the autosave timer; `None` turns autosave off
    pub autosave_interval: Option<Duration>,
    /// How long transient notifications should stay on screen
    pub notification_ttl: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            autosave_interval: Some(DEFAULT_AUTOSAVE_INTERVAL),
            notification_ttl: DEFAULT_NOTIFICATION_TTL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No changes since the last save or load
    Idle,
    Dirty,
    Saving,
    SaveFailed,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SessionState::Idle => "idle",
            SessionState::Dirty => "dirty",
            SessionState::Saving => "saving",
            SessionState::SaveFailed => "save failed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved { version: u64 },
    /// Nothing to write; the stored copy is current
    Unchanged,
}

/// Events for whatever surface shows session status.
///
/// Autosave is silent: it never produces `Saved`, `SaveFailed` or
/// `ValidationFailed`.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    StateChanged(SessionState),
    Saved { version: u64 },
    SaveFailed { message: String, ttl: Duration },
    ValidationFailed { report: ValidationReport, ttl: Duration },
    Loaded { issues: usize },
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum SessionError {
    #[error("document is invalid: {0}")]
    ValidationFailed(ValidationReport),

    #[error("save failed: {0}")]
    Gateway(Arc<GatewayError>),

    #[error("could not load document: {0}")]
    Deserialization(Arc<DeserializationError>),

    #[error("could not encode document: {0}")]
    Encode(Arc<serde_json::Error>),

    #[error(transparent)]
    Edit(Arc<EditError>),

    #[error("a save is in progress")]
    SaveInFlight,

    #[error("document version {0} cannot be incremented")]
    VersionExhausted(u64),

    #[error("session is closed")]
    Closed,
}

impl From<GatewayError> for SessionError {
    fn from(err: GatewayError) -> Self {
        Self::Gateway(Arc::new(err))
    }
}

impl From<DeserializationError> for SessionError {
    fn from(err: DeserializationError) -> Self {
        Self::Deserialization(Arc::new(err))
    }
}

impl From<EditError> for SessionError {
    fn from(err: EditError) -> Self {
        Self::Edit(Arc::new(err))
    }
}

impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        Self::Encode(Arc::new(err))
    }
}

/// Handle to a running editor session.
///
/// Clones share the same session. When the last handle is dropped the
/// session stops its autosave timer, finishes any in-flight save and exits.
#[derive(Clone)]
pub struct EditorSession {
    tx: mpsc::UnboundedSender<Command>,
    notifications: broadcast::Sender<Notification>,
}

impl EditorSession {
    /// Start a session around an existing document. Must be called from
    /// within a tokio runtime.
    pub fn spawn(
        document: Document,
        registry: Arc<SchemaRegistry>,
        gateway: Arc<dyn PersistenceGateway>,
        converter: Converter,
        options: SessionOptions,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let (notifications, _) = broadcast::channel(NOTIFICATION_CAPACITY);

        let actor = SessionActor::new(
            document,
            registry,
            gateway,
            converter,
            options,
            notifications.clone(),
        );
        tokio::spawn(actor.run(rx));

        Self { tx, notifications }
    }

    /// Start a session on a stored document
    pub async fn open(
        id: DocumentId,
        registry: Arc<SchemaRegistry>,
        gateway: Arc<dyn PersistenceGateway>,
        converter: Converter,
        options: SessionOptions,
    ) -> Result<(Self, Vec<LoadIssue>), SessionError> {
        let session = Self::spawn(
            Document::new(id.clone()),
            registry,
            gateway,
            converter,
            options,
        );
        let issues = session.load(id).await?;
        Ok((session, issues))
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.tx.send(make(reply)).map_err(|_| SessionError::Closed)?;
        rx.await.map_err(|_| SessionError::Closed)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.notifications.subscribe()
    }

    pub async fn apply(&self, cmd: Cmd) -> Result<Patch, SessionError> {
        self.request(|reply| Command::Apply { cmd, reply }).await?
    }

    pub async fn insert_block(
        &self,
        type_id: &str,
        at: Option<usize>,
    ) -> Result<Patch, SessionError> {
        self.apply(Cmd::InsertBlock {
            type_id: type_id.to_string(),
            at,
        })
        .await
    }

    pub async fn remove_block(&self, block: &BlockId) -> Result<Patch, SessionError> {
        self.apply(Cmd::RemoveBlock {
            block: block.clone(),
        })
        .await
    }

    pub async fn move_block(&self, block: &BlockId, to: usize) -> Result<Patch, SessionError> {
        self.apply(Cmd::MoveBlock {
            block: block.clone(),
            to,
        })
        .await
    }

    pub async fn update_block(
        &self,
        block: &BlockId,
        patch: Map<String, Value>,
    ) -> Result<Patch, SessionError> {
        self.apply(Cmd::UpdateBlock {
            block: block.clone(),
            patch,
        })
        .await
    }

    pub async fn validate(&self) -> Result<ValidationReport, SessionError> {
        self.request(|reply| Command::Validate { reply }).await
    }

    /// Validate and persist the document
    pub async fn save(&self) -> Result<SaveOutcome, SessionError> {
        self.request(|reply| Command::Save { reply }).await?
    }

    /// Replace the document with the stored copy of `id`
    pub async fn load(&self, id: DocumentId) -> Result<Vec<LoadIssue>, SessionError> {
        self.request(|reply| Command::Load { id, reply }).await?
    }

    /// Snapshot of the current document
    pub async fn document(&self) -> Result<Document, SessionError> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    pub async fn state(&self) -> Result<SessionState, SessionError> {
        self.request(|reply| Command::State { reply }).await
    }

    /// Read-only markup, identical to the public display
    pub async fn render(&self) -> Result<String, SessionError> {
        self.request(|reply| Command::Render { reply }).await
    }

    /// Stop the session. Returns once any in-flight save has settled.
    pub async fn close(&self) -> Result<(), SessionError> {
        self.request(|reply| Command::Close { reply }).await
    }
}
