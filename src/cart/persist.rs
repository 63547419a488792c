//! Cart snapshot persistence
//!
//! In queued mode every snapshot goes onto an unbounded channel drained by a
//! single writer task, so writes land in the order mutations happened and a
//! slow early write can never overwrite a later one. Failures never reach the
//! caller; they are logged, audited and passed to the optional callback.

use crate::audit::AuditLog;
use crate::config::PersistMode;
use crate::store::KeyValueStore;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Mutation that produced a snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
    Added { id: String },
    Incremented { id: String },
    Decremented { id: String },
}

impl CartEvent {
    /// Audit event name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Added { .. } => "cart.item_added",
            Self::Incremented { .. } => "cart.incremented",
            Self::Decremented { .. } => "cart.decremented",
        }
    }

    /// Product ID the mutation targeted
    pub fn id(&self) -> &str {
        match self {
            Self::Added { id } | Self::Incremented { id } | Self::Decremented { id } => id,
        }
    }
}

/// Result of writing one snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistOutcome {
    Written { seq: u64, bytes: usize },
    Failed { seq: u64, error: String },
}

impl PersistOutcome {
    /// Mutation sequence number the snapshot belongs to
    pub fn seq(&self) -> u64 {
        match self {
            Self::Written { seq, .. } | Self::Failed { seq, .. } => *seq,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Completion callback invoked once per snapshot
pub type PersistCallback = Arc<dyn Fn(&PersistOutcome) + Send + Sync>;

/// A serialized cart state waiting to be written
#[derive(Debug)]
pub(crate) struct Snapshot {
    pub seq: u64,
    pub blob: String,
    pub event: CartEvent,
}

pub(crate) enum Command {
    Write(Snapshot),
    Flush(oneshot::Sender<()>),
}

/// Everything a write needs besides the snapshot
#[derive(Clone)]
pub(crate) struct Sink {
    store: Arc<dyn KeyValueStore>,
    key: String,
    audit: Option<AuditLog>,
    callback: Option<PersistCallback>,
}

impl Sink {
    async fn write(&self, snapshot: Snapshot) -> PersistOutcome {
        let outcome = match self.store.set(&self.key, &snapshot.blob).await {
            Ok(()) => {
                debug!(
                    "Persisted cart #{} ({} bytes) to {} store",
                    snapshot.seq,
                    snapshot.blob.len(),
                    self.store.backend_name()
                );
                PersistOutcome::Written {
                    seq: snapshot.seq,
                    bytes: snapshot.blob.len(),
                }
            }
            Err(e) => {
                warn!("Failed to persist cart #{}: {}", snapshot.seq, e);
                PersistOutcome::Failed {
                    seq: snapshot.seq,
                    error: e.to_string(),
                }
            }
        };

        if let Some(audit) = &self.audit {
            audit
                .mutation(&self.key, snapshot.seq, &snapshot.event)
                .await;
            if let PersistOutcome::Failed { seq, error } = &outcome {
                audit.persist_failed(&self.key, *seq, error).await;
            }
        }

        if let Some(callback) = &self.callback {
            callback(&outcome);
        }

        outcome
    }
}

/// Write strategy selected by [`PersistMode`]
pub(crate) enum Persister {
    Queued {
        tx: mpsc::UnboundedSender<Command>,
        writer: Mutex<Option<JoinHandle<()>>>,
    },
    Immediate(Sink),
}

impl Persister {
    /// Build the persister; queued mode spawns the writer task
    pub fn start(
        mode: PersistMode,
        store: Arc<dyn KeyValueStore>,
        key: String,
        audit: Option<AuditLog>,
        callback: Option<PersistCallback>,
    ) -> Self {
        let sink = Sink {
            store,
            key,
            audit,
            callback,
        };

        match mode {
            PersistMode::Immediate => Self::Immediate(sink),
            PersistMode::Queued => {
                let (tx, rx) = mpsc::unbounded_channel();
                let writer = tokio::spawn(run_writer(sink, rx));
                Self::Queued {
                    tx,
                    writer: Mutex::new(Some(writer)),
                }
            }
        }
    }

    /// Hand off a snapshot; awaits the write only in immediate mode
    pub async fn persist(&self, snapshot: Snapshot) {
        match self {
            Self::Queued { tx, .. } => {
                if let Err(mpsc::error::SendError(Command::Write(snapshot))) =
                    tx.send(Command::Write(snapshot))
                {
                    warn!("Cart writer stopped; dropping snapshot #{}", snapshot.seq);
                }
            }
            Self::Immediate(sink) => {
                sink.write(snapshot).await;
            }
        }
    }

    /// Wait until every snapshot handed off so far has been written
    pub async fn flush(&self) {
        if let Self::Queued { tx, .. } = self {
            let (done_tx, done_rx) = oneshot::channel();
            if tx.send(Command::Flush(done_tx)).is_ok() {
                let _ = done_rx.await;
            }
        }
    }

    /// Drain the queue and stop the writer task
    pub async fn shutdown(&self) {
        self.flush().await;
        if let Self::Queued { writer, .. } = self {
            if let Some(handle) = writer.lock().await.take() {
                handle.abort();
                let _ = handle.await;
            }
        }
    }
}

async fn run_writer(sink: Sink, mut rx: mpsc::UnboundedReceiver<Command>) {
    while let Some(command) = rx.recv().await {
        match command {
            Command::Write(snapshot) => {
                sink.write(snapshot).await;
            }
            Command::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    debug!("Cart writer exiting");
}
