//! Request transport for Bot API calls
//!
//! A [`Request`] is a method name plus an ordered list of form fields. The
//! [`Transport`] trait executes it and hands back the raw response body;
//! it never looks inside the body and never retries.

mod http;

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tokio::io::AsyncWrite;

use crate::{Error, Result};

pub use http::HttpTransport;

/// Value of a form field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// UTF-8 text
    Text(String),
    /// Local file streamed as an attachment
    File(PathBuf),
}

/// Named form field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub value: FieldValue,
}

/// One Bot API call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    method: String,
    fields: Vec<Field>,
    long_poll: Option<Duration>,
}

impl Request {
    /// Start a request for `method` (case-sensitive, e.g. `sendMessage`)
    #[must_use]
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            fields: Vec::new(),
            long_poll: None,
        }
    }

    /// Append a text field
    #[must_use]
    pub fn text(mut self, name: &str, value: impl ToString) -> Self {
        self.fields.push(Field {
            name: name.to_string(),
            value: FieldValue::Text(value.to_string()),
        });
        self
    }

    /// Append a text field when `value` is present
    #[must_use]
    pub fn opt_text<V: ToString>(self, name: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.text(name, v),
            None => self,
        }
    }

    /// Append a JSON-encoded text field (`reply_markup`, `allowed_updates`, ...)
    ///
    /// # Errors
    ///
    /// Returns error if `value` cannot be serialized
    pub fn json<V: Serialize + ?Sized>(self, name: &str, value: &V) -> Result<Self> {
        let encoded = serde_json::to_string(value)
            .map_err(|e| Error::InvalidParameter(format!("cannot encode `{name}`: {e}")))?;
        Ok(self.text(name, encoded))
    }

    /// Append a JSON-encoded text field when `value` is present
    ///
    /// # Errors
    ///
    /// Returns error if `value` cannot be serialized
    pub fn opt_json<V: Serialize>(self, name: &str, value: Option<&V>) -> Result<Self> {
        match value {
            Some(v) => self.json(name, v),
            None => Ok(self),
        }
    }

    /// Append a file attachment read from `path` at send time
    #[must_use]
    pub fn file(mut self, name: &str, path: impl Into<PathBuf>) -> Self {
        self.fields.push(Field {
            name: name.to_string(),
            value: FieldValue::File(path.into()),
        });
        self
    }

    /// Mark the call as a long poll held open by the server for up to `wait`
    #[must_use]
    pub fn long_poll(mut self, wait: Duration) -> Self {
        self.long_poll = Some(wait);
        self
    }

    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Text value of the first field called `name`
    #[must_use]
    pub fn text_field(&self, name: &str) -> Option<&str> {
        self.fields.iter().find(|f| f.name == name).and_then(|f| match &f.value {
            FieldValue::Text(text) => Some(text.as_str()),
            FieldValue::File(_) => None,
        })
    }

    /// Path of the first file field called `name`
    #[must_use]
    pub fn file_field(&self, name: &str) -> Option<&Path> {
        self.fields.iter().find(|f| f.name == name).and_then(|f| match &f.value {
            FieldValue::File(path) => Some(path.as_path()),
            FieldValue::Text(_) => None,
        })
    }

    #[must_use]
    pub const fn long_poll_wait(&self) -> Option<Duration> {
        self.long_poll
    }

    /// Check local preconditions before any I/O
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] for an empty method or field name
    pub fn validate(&self) -> Result<()> {
        if self.method.trim().is_empty() {
            return Err(Error::InvalidParameter("method name is empty".to_string()));
        }
        if self.fields.iter().any(|f| f.name.is_empty()) {
            return Err(Error::InvalidParameter(format!(
                "{}: field name is empty",
                self.method
            )));
        }
        Ok(())
    }
}

/// Full body of a successful (HTTP 200) response
///
/// Owns its buffer; dropping it releases the memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawResponse(Vec<u8>);

impl RawResponse {
    #[must_use]
    pub const fn new(body: Vec<u8>) -> Self {
        Self(body)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for RawResponse {
    fn from(body: &str) -> Self {
        Self(body.as_bytes().to_vec())
    }
}

/// Executes Bot API requests
///
/// Implementations must map connection failures to
/// [`Error::NoConnection`] and non-200 statuses to [`Error::Status`] with
/// the body attached, so the caller can still read a failure envelope.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request` and return the buffered response body
    async fn execute(&self, request: &Request) -> Result<RawResponse>;

    /// Stream the file at `file_path` into `sink`, returning bytes written
    async fn download(
        &self,
        file_path: &str,
        sink: &mut (dyn AsyncWrite + Unpin + Send),
    ) -> Result<u64>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UpdateType;

    #[test]
    fn builds_fields_in_order() {
        let request = Request::new("sendMessage")
            .text("chat_id", -100)
            .text("text", "hello")
            .opt_text("parse_mode", None::<&str>)
            .opt_text("disable_notification", Some(true));

        let names: Vec<&str> = request.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["chat_id", "text", "disable_notification"]);
        assert_eq!(request.text_field("chat_id"), Some("-100"));
        assert_eq!(request.text_field("disable_notification"), Some("true"));
    }

    #[test]
    fn json_fields_are_encoded() {
        let request = Request::new("getUpdates")
            .json("allowed_updates", &[UpdateType::Message, UpdateType::Poll])
            .unwrap();
        assert_eq!(
            request.text_field("allowed_updates"),
            Some(r#"["message","poll"]"#)
        );
    }

    #[test]
    fn file_fields_are_not_text() {
        let request = Request::new("sendDocument").file("document", "/tmp/report.pdf");
        assert_eq!(request.text_field("document"), None);
        assert_eq!(
            request.file_field("document"),
            Some(Path::new("/tmp/report.pdf"))
        );
    }

    #[test]
    fn validate_rejects_empty_names() {
        assert!(matches!(
            Request::new("").validate(),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            Request::new("getMe").text("", 1).validate(),
            Err(Error::InvalidParameter(_))
        ));
        assert!(Request::new("getMe").validate().is_ok());
    }

    #[test]
    fn long_poll_wait_is_recorded() {
        let request = Request::new("getUpdates").long_poll(Duration::from_secs(30));
        assert_eq!(request.long_poll_wait(), Some(Duration::from_secs(30)));
    }
}
