//! Telegram Bot API client runtime
//!
//! This library talks to the Bot API over HTTPS and turns its JSON into
//! typed entities:
//! - Transport: one POST per method, multipart form fields, file streaming
//! - Envelope decoding: `ok` / `result` / `description` / `retry_after`
//! - Entity decoding for ~30 domain types, including polymorphic updates
//! - Long polling with a monotonic offset and backoff
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │            Poller  /  spawn_polling worker           │
//! │      offset tracking │ backoff │ stop handle         │
//! └──────────────────────────┬───────────────────────────┘
//!                            │
//! ┌──────────────────────────▼───────────────────────────┐
//! │                         Bot                          │
//! │   getMe │ getUpdates │ sendMessage │ getFile │ ...   │
//! └──────────────────────────┬───────────────────────────┘
//!                            │
//! ┌──────────────┬───────────▼──────────┬────────────────┐
//! │  Transport   │  Envelope decoder    │ Entity decoder │
//! │  (reqwest)   │  ok / result / error │ Decode trait   │
//! └──────────────┴──────────────────────┴────────────────┘
//! ```

pub mod bot;
pub mod config;
pub mod decode;
pub mod envelope;
pub mod error;
pub mod polling;
pub mod transport;
pub mod types;

pub use bot::{Bot, ChatAction, GetUpdates, ParseMode, SendOptions};
pub use config::{Config, PollingConfig, ProxyConfig};
pub use decode::{Decode, DecodeError};
pub use envelope::ApiError;
pub use error::{Error, ErrorKind, Result};
pub use polling::{
    BackoffPolicy, OffsetTracker, Poller, PollerState, PollingWorker, StopHandle, spawn_polling,
};
pub use transport::{HttpTransport, RawResponse, Request, Transport};
pub use types::{Update, UpdateKind, UpdateType};
