//! Poll loop on a background task, feeding an mpsc channel

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::{Poller, PollerState, StopHandle};
use crate::types::Update;
use crate::{Error, Result};

/// Running background poll loop
///
/// Updates arrive on [`PollingWorker::updates`] in the order the server
/// sent them. Dropping the receiver stops the loop after the current update.
#[derive(Debug)]
pub struct PollingWorker {
    pub updates: mpsc::Receiver<Update>,
    stop: StopHandle,
    join: JoinHandle<Result<()>>,
}

/// Move `poller` onto a tokio task
///
/// `buffer` bounds how many updates may wait in the channel; when it is
/// full the loop waits before delivering more. The offset moves past every
/// update handed to the channel, including one whose send failed because
/// the receiver was already gone, so an update dropped that way is not
/// redelivered. [`PollingWorker::shutdown`] drains the channel instead.
pub fn spawn_polling(mut poller: Poller, buffer: usize) -> PollingWorker {
    let (tx, rx) = mpsc::channel(buffer.max(1));
    let stop = poller.stop_handle();
    let loop_stop = stop.clone();

    let join = tokio::spawn(async move {
        poller
            .run(move |update| {
                let tx = tx.clone();
                let stop = loop_stop.clone();
                async move {
                    if tx.send(update).await.is_err() {
                        stop.stop();
                        return Err("update receiver dropped");
                    }
                    Ok(())
                }
            })
            .await
    });

    PollingWorker {
        updates: rx,
        stop,
        join,
    }
}

impl PollingWorker {
    /// Next update, or `None` once the loop has ended
    pub async fn recv(&mut self) -> Option<Update> {
        self.updates.recv().await
    }

    /// Ask the loop to stop without waiting for it
    pub fn stop(&self) {
        self.stop.stop();
    }

    #[must_use]
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    #[must_use]
    pub fn state(&self) -> PollerState {
        self.stop.state()
    }

    /// Stop the loop, wait for the task to finish and return the updates
    /// that were still buffered
    ///
    /// Buffered updates are already acknowledged on the server, so they are
    /// handed back rather than dropped.
    ///
    /// # Errors
    ///
    /// Returns the loop's error, or [`Error::Task`] if the task panicked
    pub async fn shutdown(mut self) -> Result<Vec<Update>> {
        self.stop.stop();

        // the sender is dropped once the loop returns
        let mut pending = Vec::new();
        while let Some(update) = self.updates.recv().await {
            pending.push(update);
        }
        if !pending.is_empty() {
            tracing::debug!(count = pending.len(), "returning buffered updates on shutdown");
        }

        self.join
            .await
            .map_err(|e| Error::Task(e.to_string()))??;
        Ok(pending)
    }

    /// Wait for the loop to end on its own (stop handle or fatal error)
    ///
    /// # Errors
    ///
    /// Returns the loop's error, or [`Error::Task`] if the task panicked
    pub async fn join(self) -> Result<()> {
        self.join
            .await
            .map_err(|e| Error::Task(e.to_string()))?
    }
}
