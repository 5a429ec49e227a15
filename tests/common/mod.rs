//! Shared test utilities
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use telegram_bot_runtime::{
    Bot, Error, PollingConfig, RawResponse, Request, Result, StopHandle, Transport,
};
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Transport that replays canned responses in order and records requests
///
/// Once the script runs out it answers with empty update batches, stopping
/// the attached poller first if one was registered.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<RawResponse>>>,
    requests: Mutex<Vec<Request>>,
    file_body: Mutex<Vec<u8>>,
    stop_when_exhausted: Mutex<Option<StopHandle>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a 200 response with `body` as-is
    pub fn push_raw(&self, body: &str) {
        self.push(Ok(RawResponse::from(body)));
    }

    /// Queue a successful envelope around `result`
    pub fn push_ok(&self, result: Value) {
        self.push_raw(&json!({"ok": true, "result": result}).to_string());
    }

    /// Queue a non-200 response carrying `body`
    pub fn push_status(&self, status: u16, body: &str) {
        self.push(Err(Error::Status {
            status,
            body: body.to_string(),
        }));
    }

    /// Queue a connection failure
    pub fn push_offline(&self) {
        self.push(Err(Error::NoConnection("connection refused".to_string())));
    }

    pub fn push(&self, response: Result<RawResponse>) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn set_file_body(&self, body: &[u8]) {
        *self.file_body.lock().unwrap() = body.to_vec();
    }

    pub fn stop_when_exhausted(&self, stop: StopHandle) {
        *self.stop_when_exhausted.lock().unwrap() = Some(stop);
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    /// `offset` field of every recorded `getUpdates` call, in order
    pub fn offsets(&self) -> Vec<Option<i64>> {
        self.requests()
            .iter()
            .filter(|r| r.method() == "getUpdates")
            .map(|r| r.text_field("offset").map(|o| o.parse().unwrap()))
            .collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, request: &Request) -> Result<RawResponse> {
        request.validate()?;
        self.requests.lock().unwrap().push(request.clone());

        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(response) => response,
            None => {
                if let Some(stop) = self.stop_when_exhausted.lock().unwrap().as_ref() {
                    stop.stop();
                }
                tokio::time::sleep(Duration::from_millis(1)).await;
                Ok(RawResponse::from(r#"{"ok":true,"result":[]}"#))
            }
        }
    }

    async fn download(
        &self,
        _file_path: &str,
        sink: &mut (dyn AsyncWrite + Unpin + Send),
    ) -> Result<u64> {
        let body = self.file_body.lock().unwrap().clone();
        sink.write_all(&body).await?;
        sink.flush().await?;
        Ok(body.len() as u64)
    }
}

pub fn bot(transport: &Arc<ScriptedTransport>) -> Bot {
    Bot::with_transport(transport.clone())
}

/// Polling settings with millisecond backoff so retry tests stay fast
pub fn fast_polling() -> PollingConfig {
    let mut config = PollingConfig::default();
    config.backoff.base_delay = Duration::from_millis(1);
    config.backoff.max_delay = Duration::from_millis(5);
    config
}

pub fn user(id: i64) -> Value {
    json!({"id": id, "is_bot": false, "first_name": "Ada"})
}

pub fn message(id: i64, text: &str) -> Value {
    json!({
        "message_id": id,
        "date": 1_700_000_000,
        "chat": {"id": 10, "type": "private", "first_name": "Ada"},
        "from": user(10),
        "text": text
    })
}

pub fn message_update(update_id: i64, text: &str) -> Value {
    json!({"update_id": update_id, "message": message(update_id, text)})
}
