use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::time::{Instant, Interval, MissedTickBehavior};

use super::{Notification, SaveOutcome, SessionError, SessionOptions, SessionState};
use crate::blocks::SchemaRegistry;
use crate::editing::{Cmd, Document, Patch, ValidationReport};
use crate::gateway::{GatewayResult, PersistenceGateway};
use crate::models::DocumentId;
use crate::render::Converter;
use crate::wire::{self, LoadIssue};

type Reply<T> = oneshot::Sender<Result<T, SessionError>>;

pub(super) enum Command {
    Apply {
        cmd: Cmd,
        reply: Reply<Patch>,
    },
    Validate {
        reply: oneshot::Sender<ValidationReport>,
    },
    Save {
        reply: Reply<SaveOutcome>,
    },
    Load {
        id: DocumentId,
        reply: Reply<Vec<LoadIssue>>,
    },
    Snapshot {
        reply: oneshot::Sender<Document>,
    },
    State {
        reply: oneshot::Sender<SessionState>,
    },
    Render {
        reply: oneshot::Sender<String>,
    },
    Close {
        reply: oneshot::Sender<()>,
    },
}

/// A gateway write that has been handed off and not yet settled
struct InFlight {
    /// Edit count when the snapshot was taken
    edits: u64,
    version: u64,
    updated_at: DateTime<Utc>,
    waiters: Vec<Reply<SaveOutcome>>,
}

pub(super) struct SessionActor {
    document: Document,
    registry: Arc<SchemaRegistry>,
    gateway: Arc<dyn PersistenceGateway>,
    converter: Converter,
    options: SessionOptions,
    notifications: broadcast::Sender<Notification>,

    state: SessionState,
    /// Successful edits since the session started
    edits: u64,
    in_flight: Option<InFlight>,
    /// A save was requested while another was in flight
    resave: bool,
    resave_waiters: Vec<Reply<SaveOutcome>>,
    autosave: Option<Interval>,
    closing: Vec<oneshot::Sender<()>>,
    stopping: bool,
}

fn autosave_interval(options: &SessionOptions) -> Option<Interval> {
    options.autosave_interval.map(|period| {
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval
    })
}

async fn next_tick(autosave: &mut Option<Interval>) {
    match autosave {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

impl SessionActor {
    pub(super) fn new(
        document: Document,
        registry: Arc<SchemaRegistry>,
        gateway: Arc<dyn PersistenceGateway>,
        converter: Converter,
        options: SessionOptions,
        notifications: broadcast::Sender<Notification>,
    ) -> Self {
        let autosave = autosave_interval(&options);
        Self {
            document,
            registry,
            gateway,
            converter,
            options,
            notifications,
            state: SessionState::Idle,
            edits: 0,
            in_flight: None,
            resave: false,
            resave_waiters: Vec::new(),
            autosave,
            closing: Vec::new(),
            stopping: false,
        }
    }

    pub(super) async fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command>) {
        let (settled_tx, mut settled_rx) = mpsc::unbounded_channel();
        log::debug!("session for {} started", self.document.id);

        loop {
            if self.stopping && self.in_flight.is_none() {
                break;
            }

            tokio::select! {
                cmd = commands.recv(), if !self.stopping => match cmd {
                    Some(cmd) => self.handle(cmd, &settled_tx).await,
                    None => self.stop(),
                },
                Some(result) = settled_rx.recv() => self.settle(result, &settled_tx),
                _ = next_tick(&mut self.autosave) => self.autosave_tick(&settled_tx),
            }
        }

        log::debug!("session for {} stopped", self.document.id);
        for reply in self.closing.drain(..) {
            let _ = reply.send(());
        }
    }

    fn notify(&self, notification: Notification) {
        // No subscribers is fine
        let _ = self.notifications.send(notification);
    }

    fn set_state(&mut self, state: SessionState) {
        if self.state != state {
            log::debug!("session {}: {} -> {}", self.document.id, self.state, state);
            self.state = state;
            self.notify(Notification::StateChanged(state));
        }
    }

    fn stop(&mut self) {
        self.stopping = true;
        self.autosave = None;
    }

    async fn handle(&mut self, cmd: Command, settled: &mpsc::UnboundedSender<GatewayResult<()>>) {
        match cmd {
            Command::Apply { cmd, reply } => {
                let _ = reply.send(self.apply(cmd));
            }
            Command::Validate { reply } => {
                let _ = reply.send(self.document.validate(&self.registry));
            }
            Command::Save { reply } => self.request_save(reply, settled),
            Command::Load { id, reply } => {
                let _ = reply.send(self.load(id).await);
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(self.document.clone());
            }
            Command::State { reply } => {
                let _ = reply.send(self.state);
            }
            Command::Render { reply } => {
                let _ = reply.send(self.converter.to_html(&self.document));
            }
            Command::Close { reply } => {
                self.closing.push(reply);
                self.stop();
            }
        }
    }

    fn apply(&mut self, cmd: Cmd) -> Result<Patch, SessionError> {
        let patch = self.document.apply(&self.registry, cmd)?;
        self.edits += 1;
        if self.state != SessionState::Saving {
            self.set_state(SessionState::Dirty);
        }
        Ok(patch)
    }

    fn request_save(
        &mut self,
        reply: Reply<SaveOutcome>,
        settled: &mpsc::UnboundedSender<GatewayResult<()>>,
    ) {
        if self.in_flight.is_some() {
            log::debug!("save of {} already in flight; queued", self.document.id);
            self.resave = true;
            self.resave_waiters.push(reply);
            return;
        }

        // The next autosave tick is a full period after an explicit save
        if let Some(interval) = self.autosave.as_mut() {
            interval.reset();
        }
        self.start_save(vec![reply], settled);
    }

    fn autosave_tick(&mut self, settled: &mpsc::UnboundedSender<GatewayResult<()>>) {
        if self.in_flight.is_some() {
            self.resave = true;
        } else if self.state == SessionState::Dirty {
            log::debug!("autosaving {}", self.document.id);
            self.start_save(Vec::new(), settled);
        }
    }

    /// Validate, serialize and hand the document to the gateway. A save with
    /// no waiters is an autosave and stays silent.
    fn start_save(
        &mut self,
        waiters: Vec<Reply<SaveOutcome>>,
        settled: &mpsc::UnboundedSender<GatewayResult<()>>,
    ) {
        let silent = waiters.is_empty();

        if self.state == SessionState::Idle {
            for reply in waiters {
                let _ = reply.send(Ok(SaveOutcome::Unchanged));
            }
            return;
        }

        let report = self.document.validate(&self.registry);
        if !report.is_valid() {
            log::info!("not saving {}: {report}", self.document.id);
            self.set_state(SessionState::Dirty);
            if !silent {
                self.notify(Notification::ValidationFailed {
                    report: report.clone(),
                    ttl: self.options.notification_ttl,
                });
            }
            for reply in waiters {
                let _ = reply.send(Err(SessionError::ValidationFailed(report.clone())));
            }
            return;
        }

        let Some(version) = self.document.version.checked_add(1) else {
            let err = SessionError::VersionExhausted(self.document.version);
            log::warn!("not saving {}: {err}", self.document.id);
            self.set_state(SessionState::Dirty);
            if !silent {
                self.notify(Notification::SaveFailed {
                    message: err.to_string(),
                    ttl: self.options.notification_ttl,
                });
            }
            for reply in waiters {
                let _ = reply.send(Err(err.clone()));
            }
            return;
        };
        let updated_at = Utc::now();
        let snapshot = Document {
            version,
            updated_at: Some(updated_at),
            ..self.document.clone()
        };
        let payload = match wire::serialize(&snapshot) {
            Ok(payload) => payload,
            Err(err) => {
                let err = SessionError::from(err);
                log::warn!("could not encode {}: {err}", self.document.id);
                for reply in waiters {
                    let _ = reply.send(Err(err.clone()));
                }
                return;
            }
        };

        self.in_flight = Some(InFlight {
            edits: self.edits,
            version,
            updated_at,
            waiters,
        });
        self.set_state(SessionState::Saving);

        let gateway = Arc::clone(&self.gateway);
        let id = self.document.id.clone();
        let settled = settled.clone();
        tokio::spawn(async move {
            let result = gateway.save(&id, &payload).await;
            let _ = settled.send(result);
        });
    }

    fn settle(
        &mut self,
        result: GatewayResult<()>,
        settled: &mpsc::UnboundedSender<GatewayResult<()>>,
    ) {
        let Some(in_flight) = self.in_flight.take() else {
            return;
        };
        let silent = in_flight.waiters.is_empty();

        match result {
            Ok(()) => {
                self.document.version = in_flight.version;
                self.document.updated_at = Some(in_flight.updated_at);
                log::info!("saved {} at version {}", self.document.id, in_flight.version);

                if self.edits == in_flight.edits {
                    self.set_state(SessionState::Idle);
                } else {
                    self.set_state(SessionState::Dirty);
                }
                if !silent {
                    self.notify(Notification::Saved {
                        version: in_flight.version,
                    });
                }
                for reply in in_flight.waiters {
                    let _ = reply.send(Ok(SaveOutcome::Saved {
                        version: in_flight.version,
                    }));
                }
            }
            Err(err) => {
                let err = SessionError::from(err);
                if silent {
                    log::warn!("autosave of {} failed: {err}", self.document.id);
                } else {
                    log::info!("save of {} failed: {err}", self.document.id);
                }

                self.set_state(SessionState::SaveFailed);
                self.set_state(SessionState::Dirty);
                if !silent {
                    self.notify(Notification::SaveFailed {
                        message: err.to_string(),
                        ttl: self.options.notification_ttl,
                    });
                }
                for reply in in_flight.waiters {
                    let _ = reply.send(Err(err.clone()));
                }
            }
        }

        if std::mem::take(&mut self.resave) {
            let waiters = std::mem::take(&mut self.resave_waiters);
            self.start_save(waiters, settled);
        }
    }

    async fn load(&mut self, id: DocumentId) -> Result<Vec<LoadIssue>, SessionError> {
        if self.in_flight.is_some() {
            return Err(SessionError::SaveInFlight);
        }

        let payload = self.gateway.load(&id).await?;
        let loaded = wire::deserialize(&self.registry, &payload)?;
        log::info!(
            "loaded {} at version {} ({} blocks, {} issues)",
            loaded.document.id,
            loaded.document.version,
            loaded.document.len(),
            loaded.issues.len()
        );

        self.document = loaded.document;
        self.set_state(SessionState::Idle);
        self.notify(Notification::Loaded {
            issues: loaded.issues.len(),
        });
        Ok(loaded.issues)
    }
}
