//! Long-polling update loop
//!
//! [`Poller`] owns the offset, so there is exactly one writer. It can be
//! driven by hand ([`Poller::poll_once`] + [`Poller::acknowledge`]), run
//! in place with a consumer ([`Poller::run`]), or moved onto a tokio task
//! with [`spawn_polling`].
//!
//! ```text
//!   Idle ──run()──▶ Polling ──stop / fatal error──▶ Idle
//! ```

mod backoff;
mod worker;

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;

use crate::bot::{Bot, GetUpdates};
use crate::config::PollingConfig;
use crate::types::Update;
use crate::Result;

pub use backoff::BackoffPolicy;
pub use worker::{PollingWorker, spawn_polling};

/// Next `offset` to request, derived from the highest update seen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OffsetTracker {
    next: Option<i64>,
}

impl OffsetTracker {
    #[must_use]
    pub const fn new() -> Self {
        Self { next: None }
    }

    /// Resume from a previously persisted offset
    #[must_use]
    pub const fn starting_at(offset: i64) -> Self {
        Self { next: Some(offset) }
    }

    /// Offset for the next `getUpdates`, `None` before any update was seen
    #[must_use]
    pub const fn next_offset(&self) -> Option<i64> {
        self.next
    }

    /// Record `update_id` as delivered; the offset never moves backwards
    pub fn advance(&mut self, update_id: i64) {
        let candidate = update_id.saturating_add(1);
        self.next = Some(self.next.map_or(candidate, |next| next.max(candidate)));
    }
}

/// Whether a poll loop is active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerState {
    Idle,
    Polling,
}

#[derive(Debug)]
struct Shared {
    stop: watch::Sender<bool>,
    running: AtomicBool,
}

/// Cloneable handle that asks a poll loop to stop
///
/// Stopping never interrupts an in-flight `getUpdates`; the loop notices
/// once the call returns, before the next delivery or iteration. A stop is
/// final: running the same poller again returns immediately.
#[derive(Debug, Clone)]
pub struct StopHandle {
    shared: Arc<Shared>,
}

impl StopHandle {
    fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                stop: watch::Sender::new(false),
                running: AtomicBool::new(false),
            }),
        }
    }

    /// Request the loop to stop
    pub fn stop(&self) {
        self.shared.stop.send_replace(true);
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        *self.shared.stop.borrow()
    }

    /// Resolve once [`StopHandle::stop`] has been called
    pub async fn stopped(&self) {
        let mut rx = self.shared.stop.subscribe();
        // Sender lives in `shared`, so the channel cannot close under us
        let _ = rx.wait_for(|stopped| *stopped).await;
    }

    /// State of the loop this handle belongs to
    #[must_use]
    pub fn state(&self) -> PollerState {
        if self.shared.running.load(Ordering::Acquire) {
            PollerState::Polling
        } else {
            PollerState::Idle
        }
    }

    fn set_running(&self, running: bool) {
        self.shared.running.store(running, Ordering::Release);
    }
}

/// Fetches updates and tracks the offset
#[derive(Debug)]
pub struct Poller {
    bot: Bot,
    config: PollingConfig,
    offset: OffsetTracker,
    stop: StopHandle,
}

impl Poller {
    #[must_use]
    pub fn new(bot: Bot, config: PollingConfig) -> Self {
        Self {
            bot,
            config,
            offset: OffsetTracker::new(),
            stop: StopHandle::new(),
        }
    }

    /// Start from `offset` instead of the server's oldest pending update
    #[must_use]
    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = OffsetTracker::starting_at(offset);
        self
    }

    #[must_use]
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    #[must_use]
    pub fn state(&self) -> PollerState {
        self.stop.state()
    }

    #[must_use]
    pub const fn next_offset(&self) -> Option<i64> {
        self.offset.next_offset()
    }

    /// Fetch the next batch using the tracked offset
    ///
    /// The offset is not advanced; call [`Poller::acknowledge`] for each
    /// update once it has been handled.
    ///
    /// # Errors
    ///
    /// Returns error if the call fails; no state is changed
    pub async fn poll_once(&mut self) -> Result<Vec<Update>> {
        let params = GetUpdates {
            offset: self.offset.next_offset(),
            limit: Some(self.config.limit),
            timeout: Some(self.config.timeout),
            allowed_updates: self.config.allowed_updates.clone(),
        };
        let batch = self.bot.get_updates(&params).await?;
        tracing::debug!(
            offset = ?params.offset,
            count = batch.len(),
            "received update batch"
        );
        Ok(batch)
    }

    /// Mark `update` as delivered
    pub fn acknowledge(&mut self, update: &Update) {
        self.offset.advance(update.id);
    }

    /// Poll until stopped, handing every update to `consumer` in order
    ///
    /// The offset advances after each delivery whether or not the consumer
    /// succeeded. Failed iterations are retried per the backoff policy.
    ///
    /// # Errors
    ///
    /// Returns the last error when it is fatal (closed handler, invalid
    /// parameters) or the backoff policy gives up
    pub async fn run<F, Fut, E>(&mut self, mut consumer: F) -> Result<()>
    where
        F: FnMut(Update) -> Fut,
        Fut: Future<Output = std::result::Result<(), E>>,
        E: Display,
    {
        self.stop.set_running(true);
        tracing::info!(offset = ?self.offset.next_offset(), "polling started");

        let result = self.run_loop(&mut consumer).await;

        self.stop.set_running(false);
        match &result {
            Ok(()) => tracing::info!(offset = ?self.offset.next_offset(), "polling stopped"),
            Err(e) => tracing::error!(error = %e, "polling stopped on error"),
        }
        result
    }

    async fn run_loop<F, Fut, E>(&mut self, consumer: &mut F) -> Result<()>
    where
        F: FnMut(Update) -> Fut,
        Fut: Future<Output = std::result::Result<(), E>>,
        E: Display,
    {
        let mut failures: u32 = 0;

        while !self.stop.is_stopped() {
            let batch = match self.poll_once().await {
                Ok(batch) => {
                    failures = 0;
                    batch
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    let Some(delay) = self.config.backoff.next_delay(failures, e.retry_after())
                    else {
                        return Err(e);
                    };
                    failures = failures.saturating_add(1);
                    tracing::warn!(
                        error = %e,
                        attempt = failures,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        "getUpdates failed, retrying"
                    );
                    tokio::select! {
                        () = tokio::time::sleep(delay) => {}
                        () = self.stop.stopped() => {}
                    }
                    continue;
                }
            };

            for update in batch {
                if self.stop.is_stopped() {
                    break;
                }
                let id = update.id;
                if let Err(e) = consumer(update).await {
                    tracing::warn!(update_id = id, error = %e, "update consumer failed");
                }
                self.offset.advance(id);
            }
        }

        Ok(())
    }
}
