//! Single-writer persistence queue.
//!
//! Every accepted mutation produces a [`PersistTask`] holding the full
//! encoded cart. Tasks go into an unbounded channel drained by one tokio
//! task, which awaits each `set` before taking the next. Writes to the key
//! therefore land in mutation order, and an older snapshot can never
//! overwrite a newer one.
//!
//! When coalescing is on, a writer that falls behind skips to the newest
//! queued snapshot. Only the last write to a key is observable, so the
//! durable result is the same.

use std::sync::{Arc, Mutex};

use cartkit_store::{Store, StoreError};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::error::{CartError, Result};

/// A full cart snapshot waiting to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistTask {
    /// Mutation count that produced this snapshot.
    pub revision: u64,
    /// Encoded cart.
    pub payload: String,
}

/// The most recent write failure, held until someone flushes.
#[derive(Debug)]
struct PersistFailure {
    revision: u64,
    source: StoreError,
}

impl From<PersistFailure> for CartError {
    fn from(failure: PersistFailure) -> Self {
        CartError::Persist {
            revision: failure.revision,
            source: failure.source,
        }
    }
}

type Ack = oneshot::Sender<Option<PersistFailure>>;

enum WriterMsg {
    Write(PersistTask),
    Control(Control),
}

enum Control {
    Flush(Ack),
    Shutdown(Ack),
}

/// Handle to the writer task.
pub(crate) struct PersistQueue {
    tx: mpsc::UnboundedSender<WriterMsg>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl PersistQueue {
    /// Spawn the writer on the current runtime.
    pub(crate) fn spawn(store: Arc<dyn Store>, key: String, coalesce: bool) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let writer = Writer {
            store,
            key,
            coalesce,
            last_failure: None,
        };
        let handle = tokio::spawn(writer.run(rx));
        Self {
            tx,
            handle: Mutex::new(Some(handle)),
        }
    }

    /// Queue a snapshot. Never blocks.
    pub(crate) fn enqueue(&self, task: PersistTask) {
        let revision = task.revision;
        if self.tx.send(WriterMsg::Write(task)).is_err() {
            tracing::warn!(revision, "cart writer closed; change kept in memory only");
        }
    }

    /// Wait until every snapshot queued so far has been attempted.
    pub(crate) async fn flush(&self) -> Result<()> {
        let (ack, done) = oneshot::channel();
        self.tx
            .send(WriterMsg::Control(Control::Flush(ack)))
            .map_err(|_| CartError::WriterClosed)?;
        match done.await.map_err(|_| CartError::WriterClosed)? {
            Some(failure) => Err(failure.into()),
            None => Ok(()),
        }
    }

    /// Drain the queue and stop the writer.
    pub(crate) async fn shutdown(&self) -> Result<()> {
        let (ack, done) = oneshot::channel();
        self.tx
            .send(WriterMsg::Control(Control::Shutdown(ack)))
            .map_err(|_| CartError::WriterClosed)?;
        let outcome = done.await.map_err(|_| CartError::WriterClosed)?;

        let handle = match self.handle.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "cart writer task ended abnormally");
            }
        }

        match outcome {
            Some(failure) => Err(failure.into()),
            None => Ok(()),
        }
    }
}

struct Writer {
    store: Arc<dyn Store>,
    key: String,
    coalesce: bool,
    last_failure: Option<PersistFailure>,
}

impl Writer {
    async fn run(mut self, mut rx: mpsc::UnboundedReceiver<WriterMsg>) {
        while let Some(msg) = rx.recv().await {
            let control = match msg {
                WriterMsg::Write(task) => {
                    let (task, next) = if self.coalesce {
                        Self::coalesce(task, &mut rx)
                    } else {
                        (task, None)
                    };
                    self.write(task).await;
                    match next {
                        Some(control) => control,
                        None => continue,
                    }
                }
                WriterMsg::Control(control) => control,
            };

            match control {
                Control::Flush(ack) => self.ack(ack),
                Control::Shutdown(ack) => {
                    self.ack(ack);
                    break;
                }
            }
        }
        tracing::debug!(key = %self.key, "cart writer stopped");
    }

    /// Skip ahead to the newest queued snapshot.
    ///
    /// Stops at the first control message, which is returned so it is
    /// handled after the write it was queued behind.
    fn coalesce(
        mut task: PersistTask,
        rx: &mut mpsc::UnboundedReceiver<WriterMsg>,
    ) -> (PersistTask, Option<Control>) {
        while let Ok(msg) = rx.try_recv() {
            match msg {
                WriterMsg::Write(newer) => {
                    tracing::trace!(skipped = task.revision, newer = newer.revision, "coalescing cart write");
                    task = newer;
                }
                WriterMsg::Control(control) => return (task, Some(control)),
            }
        }
        (task, None)
    }

    async fn write(&mut self, task: PersistTask) {
        match self.store.set(&self.key, &task.payload).await {
            Ok(()) => {
                tracing::debug!(revision = task.revision, "persisted cart");
            }
            Err(source) => {
                tracing::warn!(revision = task.revision, error = %source, "failed to persist cart");
                self.last_failure = Some(PersistFailure {
                    revision: task.revision,
                    source,
                });
            }
        }
    }

    fn ack(&mut self, ack: Ack) {
        // The flusher may have stopped waiting.
        let _ = ack.send(self.last_failure.take());
    }
}
