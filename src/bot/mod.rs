//! Bot handler
//!
//! [`Bot`] ties a [`Transport`] to the envelope and entity decoders. Every
//! method in [`api`] goes through [`Bot::call`].

mod api;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::Config;
use crate::decode::Decode;
use crate::envelope::{decode_response, status_failure};
use crate::transport::{HttpTransport, Request, Transport};
use crate::{Error, Result};

pub use api::{ChatAction, GetUpdates, ParseMode, SendOptions};

/// Handle for one bot account
///
/// Cloning is cheap and clones share the transport and the closed flag.
#[derive(Clone)]
pub struct Bot {
    transport: Arc<dyn Transport>,
    closed: Arc<AtomicBool>,
}

impl std::fmt::Debug for Bot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bot")
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

impl Bot {
    /// Create a bot talking HTTPS to the configured server
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self::with_transport(Arc::new(HttpTransport::new(config)?)))
    }

    /// Create a bot over any transport
    #[must_use]
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether `log_out` or `close` has succeeded on this handler
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(Error::NotSupported);
        }
        Ok(())
    }

    fn mark_closed(&self) {
        self.closed.store(true, Ordering::Release);
    }

    pub(crate) fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    /// Execute `request` and decode its `result` as `T`
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotSupported`] on a closed handler, otherwise any
    /// transport, envelope or decode failure
    pub async fn call<T: Decode>(&self, request: Request) -> Result<T> {
        self.ensure_open()?;

        let response = match self.transport.execute(&request).await {
            Ok(response) => response,
            Err(Error::Status { status, body }) => return Err(status_failure(status, body)),
            Err(e) => return Err(e),
        };

        decode_response(response.as_bytes()).inspect_err(|e| {
            tracing::debug!(method = request.method(), error = %e, "Bot API call failed");
        })
    }
}
