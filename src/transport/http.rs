//! `reqwest`-backed transport

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use url::Url;

use super::{FieldValue, RawResponse, Request, Transport};
use crate::config::Config;
use crate::{Error, Result};

/// Upper bound on establishing a TCP/TLS connection
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTPS transport against `<api_url>/bot<token>/<method>`
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    api_url: Url,
    token: SecretString,
    request_timeout: Duration,
    long_poll_margin: Duration,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("api_url", &self.api_url.as_str())
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}

impl HttpTransport {
    /// Build a transport from configuration, applying the proxy if set
    ///
    /// # Errors
    ///
    /// Returns error if the proxy URL is rejected or the client cannot be built
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = Client::builder().connect_timeout(CONNECT_TIMEOUT);

        if let Some(proxy_config) = &config.proxy {
            let mut proxy = reqwest::Proxy::all(proxy_config.url.as_str())
                .map_err(|e| Error::Config(format!("invalid proxy: {}", e.without_url())))?;
            if let Some(username) = &proxy_config.username {
                let password = proxy_config
                    .password
                    .as_ref()
                    .map_or("", |p| p.expose_secret());
                proxy = proxy.basic_auth(username, password);
            }
            builder = builder.proxy(proxy);
            tracing::debug!(proxy = %proxy_config.url.host_str().unwrap_or_default(), "using proxy");
        }

        let client = builder
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self::from_client(client, config))
    }

    fn from_client(client: Client, config: &Config) -> Self {
        Self {
            client,
            api_url: config.api_url.clone(),
            token: config.token.clone(),
            request_timeout: config.request_timeout,
            long_poll_margin: config.long_poll_margin,
        }
    }

    fn base(&self) -> &str {
        self.api_url.as_str().trim_end_matches('/')
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{method}", self.base(), self.token.expose_secret())
    }

    fn file_url(&self, file_path: &str) -> String {
        format!(
            "{}/file/bot{}/{}",
            self.base(),
            self.token.expose_secret(),
            file_path.trim_start_matches('/')
        )
    }

    /// Total time allowed for a call
    ///
    /// Long polls are held open by the server, so the client deadline must
    /// outlast the poll wait or every idle poll would fail.
    fn timeout_for(&self, request: &Request) -> Duration {
        request.long_poll_wait().map_or(self.request_timeout, |wait| {
            self.request_timeout.max(wait + self.long_poll_margin)
        })
    }
}

/// Build the multipart body, streaming file fields from disk
async fn build_form(request: &Request) -> Result<Form> {
    let mut form = Form::new();

    for field in request.fields() {
        form = match &field.value {
            FieldValue::Text(text) => form.text(field.name.clone(), text.clone()),
            FieldValue::File(path) => {
                let file = tokio::fs::File::open(path).await.map_err(|e| {
                    Error::InvalidParameter(format!(
                        "cannot open `{}` for field `{}`: {e}",
                        path.display(),
                        field.name
                    ))
                })?;
                let len = file.metadata().await?.len();
                let file_name = path.file_name().map_or_else(
                    || field.name.clone(),
                    |n| n.to_string_lossy().into_owned(),
                );
                let part = Part::stream_with_length(Body::from(file), len).file_name(file_name);
                form.part(field.name.clone(), part)
            }
        };
    }

    Ok(form)
}

/// Await `fut`, failing with `NoConnection` if it does not finish within `idle`
async fn within<F: Future>(idle: Duration, fut: F) -> Result<F::Output> {
    tokio::time::timeout(idle, fut).await.map_err(|_| {
        Error::NoConnection(format!("no data received for {} ms", idle.as_millis()))
    })
}

/// Buffer the whole body, failing with `OutOfMemory` instead of aborting
async fn read_body(mut response: Response) -> Result<Vec<u8>> {
    let mut buf = Vec::new();

    if let Some(len) = response.content_length() {
        let len = usize::try_from(len).map_err(|_| Error::OutOfMemory)?;
        buf.try_reserve_exact(len)?;
    }

    while let Some(chunk) = response.chunk().await? {
        buf.try_reserve(chunk.len())?;
        buf.extend_from_slice(&chunk);
    }

    Ok(buf)
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: &Request) -> Result<RawResponse> {
        request.validate()?;
        let method = request.method();

        let mut builder = self
            .client
            .post(self.method_url(method))
            .timeout(self.timeout_for(request));
        if !request.fields().is_empty() {
            builder = builder.multipart(build_form(request).await?);
        }

        tracing::debug!(method, fields = request.fields().len(), "calling Bot API");

        let response = builder.send().await?;
        let status = response.status();
        let body = read_body(response).await?;

        if status != StatusCode::OK {
            tracing::warn!(method, status = status.as_u16(), "Bot API returned non-200 status");
            return Err(Error::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        Ok(RawResponse::new(body))
    }

    async fn download(
        &self,
        file_path: &str,
        sink: &mut (dyn AsyncWrite + Unpin + Send),
    ) -> Result<u64> {
        if file_path.trim().is_empty() {
            return Err(Error::InvalidParameter("file path is empty".to_string()));
        }

        // The body has no overall deadline; each read must make progress
        // within `request_timeout`
        let idle = self.request_timeout;
        let response = within(idle, self.client.get(self.file_url(file_path)).send()).await??;

        let status = response.status();
        if status != StatusCode::OK {
            let body = within(idle, read_body(response)).await??;
            tracing::warn!(file_path, status = status.as_u16(), "file download failed");
            return Err(Error::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        let mut written: u64 = 0;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = within(idle, stream.next()).await? {
            let chunk = chunk?;
            sink.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        sink.flush().await?;

        tracing::debug!(file_path, bytes = written, "file downloaded");
        Ok(written)
    }
}
