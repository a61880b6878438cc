//! # Autosave
//!
//! Background worker that persists designer content with a trailing throttle.
//!
//! ```text
//!  Designer ──watch(Snapshot)──▶ ┌──────────────────────┐ ──save()──▶ Persistence
//!           ──mpsc(Command)────▶ │ AutosaveCoordinator  │
//!           ◀──mpsc(SaveEvent)── └──────────────────────┘ ──notify()─▶ Notifier
//! ```
//!
//! ## Rules
//!
//! - The first change after an idle period arms a deadline one throttle
//!   interval away. Later changes do not move it.
//! - At the deadline the *latest* snapshot is written, so a burst of edits
//!   within one interval costs exactly one write.
//! - Writes never overlap. Changes that arrive during a write arm a single
//!   follow-up once it completes.
//! - A failed write notifies the user and waits for the next change or an
//!   explicit retry.
//! - Publishing writes immediately and permanently stops throttled writes.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use formcraft_common::{FormId, FormPatch, Notification, Notifier, Persistence, PersistenceError};
use formcraft_fields::{serialize_elements, Element, FieldError};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};

pub const SAVE_FAILED_MESSAGE: &str = "Something went wrong while saving. Please try again.";

/// Save progress as seen by the designer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SaveState {
    pub unsaved_changes: bool,
    pub saved_at: Option<DateTime<Utc>>,
    pub save_in_flight: bool,
}

/// Content handed to the worker, tagged with the designer revision it
/// reflects
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub revision: u64,
    pub elements: Arc<Vec<Element>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SaveEvent {
    Started { revision: u64 },
    Saved { revision: u64, at: DateTime<Utc> },
    Failed { revision: u64, error: String },
}

#[derive(Error, Debug)]
pub enum AutosaveError {
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Field error: {0}")]
    Field(#[from] FieldError),

    #[error("Autosave worker has stopped")]
    Stopped,
}

enum Command {
    Publish {
        snapshot: Snapshot,
        reply: oneshot::Sender<Result<DateTime<Utc>, AutosaveError>>,
    },
    Retry,
}

/// Designer-side end of a running autosave worker
#[derive(Debug)]
pub struct AutosaveHandle {
    content: watch::Sender<Snapshot>,
    commands: mpsc::UnboundedSender<Command>,
    events: mpsc::UnboundedReceiver<SaveEvent>,
    task: JoinHandle<()>,
    published: bool,
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::Publish { snapshot, .. } => f
                .debug_struct("Publish")
                .field("revision", &snapshot.revision)
                .finish(),
            Command::Retry => f.write_str("Retry"),
        }
    }
}

impl AutosaveHandle {
    /// Hand the worker new content. Returns false once published.
    pub fn schedule(&mut self, snapshot: Snapshot) -> bool {
        if self.published {
            tracing::debug!(revision = snapshot.revision, "Ignoring change after publish");
            return false;
        }
        self.content.send_replace(snapshot);
        true
    }

    /// Arm a write of the latest content without waiting for a new change
    pub fn retry(&self) -> bool {
        !self.published && self.commands.send(Command::Retry).is_ok()
    }

    /// Write `snapshot` immediately with the published flag set
    pub async fn publish(&mut self, snapshot: Snapshot) -> Result<DateTime<Utc>, AutosaveError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Command::Publish { snapshot, reply })
            .map_err(|_| AutosaveError::Stopped)?;

        let at = response.await.map_err(|_| AutosaveError::Stopped)??;
        self.published = true;
        Ok(at)
    }

    pub fn is_published(&self) -> bool {
        self.published
    }

    pub fn try_next_event(&mut self) -> Option<SaveEvent> {
        self.events.try_recv().ok()
    }

    pub async fn next_event(&mut self) -> Option<SaveEvent> {
        self.events.recv().await
    }

    /// Flush anything pending and wait for the worker to exit
    pub async fn shutdown(self) {
        let AutosaveHandle {
            content,
            commands,
            task,
            ..
        } = self;
        drop(content);
        drop(commands);
        if let Err(e) = task.await {
            tracing::error!("Autosave worker panicked: {}", e);
        }
    }
}

/// The autosave worker
pub struct AutosaveCoordinator {
    form_id: FormId,
    persistence: Arc<dyn Persistence>,
    notifier: Arc<dyn Notifier>,
    interval: Duration,
}

impl AutosaveCoordinator {
    pub fn new(
        form_id: FormId,
        persistence: Arc<dyn Persistence>,
        notifier: Arc<dyn Notifier>,
        interval: Duration,
    ) -> Self {
        Self {
            form_id,
            persistence,
            notifier,
            interval,
        }
    }

    /// Start the worker on the current tokio runtime
    pub fn spawn(self, initial: Snapshot) -> AutosaveHandle {
        let (content_tx, content_rx) = watch::channel(initial);
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let task = tokio::spawn(self.run(content_rx, command_rx, event_tx));

        AutosaveHandle {
            content: content_tx,
            commands: command_tx,
            events: event_rx,
            task,
            published: false,
        }
    }

    async fn run(
        self,
        mut content: watch::Receiver<Snapshot>,
        mut commands: mpsc::UnboundedReceiver<Command>,
        events: mpsc::UnboundedSender<SaveEvent>,
    ) {
        let mut deadline: Option<Instant> = None;
        let mut published = false;
        let mut written = content.borrow().revision;

        tracing::debug!(form = %self.form_id, interval = ?self.interval, "Autosave started");

        loop {
            tokio::select! {
                biased;

                command = commands.recv() => match command {
                    Some(Command::Publish { snapshot, reply }) => {
                        let result = self.publish(&snapshot).await;
                        if result.is_ok() {
                            published = true;
                            deadline = None;
                            written = snapshot.revision;
                        }
                        let _ = reply.send(result);
                    }
                    Some(Command::Retry) => {
                        if !published && deadline.is_none() {
                            deadline = Some(Instant::now() + self.interval);
                        }
                    }
                    None => break,
                },

                changed = content.changed(), if !published => {
                    if changed.is_err() {
                        break;
                    }
                    if deadline.is_none() {
                        deadline = Some(Instant::now() + self.interval);
                    }
                }

                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    deadline = None;
                    let snapshot = content.borrow_and_update().clone();
                    if self.flush(&snapshot, &events).await {
                        written = snapshot.revision;
                    }
                }
            }
        }

        // Designer went away with changes not yet persisted
        let snapshot = content.borrow().clone();
        if !published && snapshot.revision != written {
            self.flush(&snapshot, &events).await;
        }

        tracing::debug!(form = %self.form_id, "Autosave stopped");
    }

    /// Returns whether the write landed
    async fn flush(&self, snapshot: &Snapshot, events: &mpsc::UnboundedSender<SaveEvent>) -> bool {
        let revision = snapshot.revision;
        let _ = events.send(SaveEvent::Started { revision });

        match self.write(snapshot, false).await {
            Ok(at) => {
                tracing::info!(form = %self.form_id, revision, "Saved form");
                let _ = events.send(SaveEvent::Saved { revision, at });
                true
            }
            Err(e) => {
                tracing::warn!(form = %self.form_id, revision, "Save failed: {}", e);
                self.notifier.notify(Notification::error(SAVE_FAILED_MESSAGE));
                let _ = events.send(SaveEvent::Failed {
                    revision,
                    error: e.to_string(),
                });
                false
            }
        }
    }

    async fn publish(&self, snapshot: &Snapshot) -> Result<DateTime<Utc>, AutosaveError> {
        match self.write(snapshot, true).await {
            Ok(at) => {
                tracing::info!(form = %self.form_id, revision = snapshot.revision, "Published form");
                Ok(at)
            }
            Err(e) => {
                tracing::warn!(form = %self.form_id, "Publish failed: {}", e);
                self.notifier.notify(Notification::error(SAVE_FAILED_MESSAGE));
                Err(e)
            }
        }
    }

    async fn write(&self, snapshot: &Snapshot, publish: bool) -> Result<DateTime<Utc>, AutosaveError> {
        let content = serialize_elements(&snapshot.elements)?;
        let patch = if publish {
            FormPatch::publish(content)
        } else {
            FormPatch::content(content)
        };

        self.persistence.save(&self.form_id, patch).await?;
        Ok(Utc::now())
    }
}
