//! Error types for the Bot API runtime

use std::collections::TryReserveError;
use std::time::Duration;

use thiserror::Error;

use crate::decode::DecodeError;
use crate::envelope::ApiError;

/// Result type alias for runtime operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to the Bot API
#[derive(Debug, Error)]
pub enum Error {
    /// Local precondition violated before any I/O
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Buffer allocation failed while reading a response
    #[error("out of memory while buffering response")]
    OutOfMemory,

    /// Connection, DNS, timeout or body read failure
    #[error("no connection: {0}")]
    NoConnection(String),

    /// Non-200 HTTP status without a decodable failure envelope
    #[error("HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    /// The platform answered `ok: false`
    #[error(transparent)]
    Api(ApiError),

    /// Malformed payload or missing mandatory field on the root entity
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Call made on a handler that has been logged out or closed
    #[error("operation not supported: bot handler is closed")]
    NotSupported,

    /// IO error (file uploads, download sinks)
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Background polling task panicked or was aborted
    #[error("polling task failed: {0}")]
    Task(String),
}

/// Coarse error category callers can branch on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidParameter,
    OutOfMemory,
    NoConnection,
    OperationFailed,
    NotSupported,
}

impl Error {
    /// Category of this error
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidParameter(_) | Self::Config(_) => ErrorKind::InvalidParameter,
            Self::OutOfMemory => ErrorKind::OutOfMemory,
            Self::NoConnection(_) | Self::Io(_) | Self::Task(_) => ErrorKind::NoConnection,
            Self::Status { .. } | Self::Api(_) | Self::Decode(_) => ErrorKind::OperationFailed,
            Self::NotSupported => ErrorKind::NotSupported,
        }
    }

    /// Flood-control wait requested by the platform, if any
    #[must_use]
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::Api(api) => api.retry_after(),
            _ => None,
        }
    }

    /// HTTP status or Bot API error code attached to this error
    #[must_use]
    pub fn status_code(&self) -> Option<i64> {
        match self {
            Self::Status { status, .. } => Some(i64::from(*status)),
            Self::Api(api) => api.error_code,
            _ => None,
        }
    }

    /// Whether retrying the same call later may succeed
    ///
    /// Connection loss, rate limits (429) and server errors (5xx) are
    /// recoverable; everything else needs the caller to change something.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::NoConnection(_) => true,
            Self::Status { .. } | Self::Api(_) => self
                .status_code()
                .is_some_and(|code| code == 429 || (500..600).contains(&code)),
            _ => false,
        }
    }

    /// Whether the error can never clear up for this handler
    ///
    /// The polling loop shuts down on these instead of retrying.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::NotSupported | Self::InvalidParameter(_) | Self::Config(_)
        )
    }
}

impl From<ApiError> for Error {
    fn from(e: ApiError) -> Self {
        Self::Api(e)
    }
}

impl From<TryReserveError> for Error {
    fn from(_: TryReserveError) -> Self {
        Self::OutOfMemory
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        // Request URLs embed the bot token
        let e = e.without_url();
        if let Some(status) = e.status() {
            return Self::Status {
                status: status.as_u16(),
                body: e.to_string(),
            };
        }
        if e.is_builder() {
            return Self::InvalidParameter(e.to_string());
        }
        Self::NoConnection(e.to_string())
    }
}
