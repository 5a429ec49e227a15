//! Response envelope: `{ok, result | description, error_code, parameters}`
//!
//! Every Bot API response shares this wrapper regardless of HTTP status.
//! The envelope is checked once here so the entity decoders only ever see
//! the success payload.

use std::time::Duration;

use serde_json::Value;

use crate::decode::{Decode, DecodeError, Object};
use crate::types::ResponseParameters;
use crate::{Error, Result};

/// Semantic failure reported by the platform with `ok: false`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Telegram API error {}: {}", .error_code.unwrap_or_default(), .description.as_deref().unwrap_or("no description"))]
pub struct ApiError {
    /// Numeric error code, usually mirrors the HTTP status
    pub error_code: Option<i64>,
    /// Human-readable reason
    pub description: Option<String>,
    /// Flow-control hints
    pub parameters: Option<ResponseParameters>,
}

impl ApiError {
    /// How long to wait before retrying after flood control
    #[must_use]
    pub fn retry_after(&self) -> Option<Duration> {
        self.parameters
            .as_ref()
            .and_then(|p| p.retry_after)
            .map(Duration::from_secs)
    }

    /// New chat id after a group was upgraded to a supergroup
    #[must_use]
    pub fn migrate_to_chat_id(&self) -> Option<i64> {
        self.parameters.as_ref().and_then(|p| p.migrate_to_chat_id)
    }

    fn from_envelope(obj: &Object<'_>) -> Self {
        Self {
            error_code: obj.optional("error_code"),
            description: obj.optional("description"),
            parameters: obj.nested("parameters"),
        }
    }
}

/// Validate the envelope and return the `result` payload
///
/// # Errors
///
/// Returns [`Error::Decode`] if the bytes are not a JSON object or a
/// successful envelope lacks `result`, and [`Error::Api`] when `ok` is
/// absent or false.
pub fn decode_envelope(bytes: &[u8]) -> Result<Value> {
    let mut value: Value = serde_json::from_slice(bytes).map_err(DecodeError::from)?;
    let obj = Object::new("envelope", &value)?;

    if obj.optional::<bool>("ok") != Some(true) {
        return Err(Error::Api(ApiError::from_envelope(&obj)));
    }

    if !obj.has("result") {
        return Err(DecodeError::MissingField("result").into());
    }

    Ok(value
        .as_object_mut()
        .and_then(|map| map.remove("result"))
        .unwrap_or(Value::Null))
}

/// Decode the envelope and then the payload as `T`
///
/// # Errors
///
/// Returns error if the envelope reports failure or `T` cannot be decoded
pub fn decode_response<T: Decode>(bytes: &[u8]) -> Result<T> {
    let payload = decode_envelope(bytes)?;
    Ok(T::decode(&payload)?)
}

/// Map a non-200 response to an error
///
/// The platform sends the failure envelope with non-200 statuses too, so a
/// decodable body becomes [`Error::Api`] and keeps `retry_after`. Anything
/// else stays a plain status error.
#[must_use]
pub fn status_failure(status: u16, body: String) -> Error {
    match decode_envelope(body.as_bytes()) {
        Err(Error::Api(api)) => Error::Api(api),
        _ => Error::Status { status, body },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::User;

    #[test]
    fn success_yields_result() {
        let body = br#"{"ok":true,"result":{"id":123,"is_bot":true,"first_name":"Bot"}}"#;
        let user: User = decode_response(body).unwrap();
        assert_eq!(user.id, 123);
        assert!(user.is_bot);
        assert_eq!(user.first_name, "Bot");
        assert_eq!(user.last_name, None);
        assert_eq!(user.username, None);
    }

    #[test]
    fn flood_control_failure_carries_retry_after() {
        let body = br#"{"ok":false,"error_code":429,"description":"Too Many Requests","parameters":{"retry_after":5}}"#;
        let err = decode_envelope(body).unwrap_err();
        let Error::Api(api) = &err else {
            panic!("expected Api error, got {err:?}");
        };
        assert_eq!(api.error_code, Some(429));
        assert_eq!(api.description.as_deref(), Some("Too Many Requests"));
        assert_eq!(api.retry_after(), Some(Duration::from_secs(5)));
        assert_eq!(err.kind(), crate::ErrorKind::OperationFailed);
    }

    #[test]
    fn missing_ok_is_failure() {
        let err = decode_envelope(br#"{"result":true}"#).unwrap_err();
        assert!(matches!(err, Error::Api(ApiError { error_code: None, .. })));
    }

    #[test]
    fn migrate_to_chat_id_exposed() {
        let body = br#"{"ok":false,"error_code":400,"description":"Bad Request: group chat was upgraded to a supergroup chat","parameters":{"migrate_to_chat_id":-1001234567890}}"#;
        let Err(Error::Api(api)) = decode_envelope(body) else {
            panic!("expected Api error");
        };
        assert_eq!(api.migrate_to_chat_id(), Some(-1_001_234_567_890));
        assert_eq!(api.retry_after(), None);
    }

    #[test]
    fn malformed_json_is_decode_error() {
        let err = decode_envelope(b"<html>Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, Error::Decode(DecodeError::Json(_))));
    }

    #[test]
    fn ok_without_result_is_decode_error() {
        let err = decode_envelope(br#"{"ok":true}"#).unwrap_err();
        assert!(matches!(err, Error::Decode(DecodeError::MissingField("result"))));
    }

    #[test]
    fn status_failure_prefers_envelope() {
        let err = status_failure(
            429,
            r#"{"ok":false,"error_code":429,"description":"Too Many Requests","parameters":{"retry_after":7}}"#
                .to_string(),
        );
        assert_eq!(err.retry_after(), Some(Duration::from_secs(7)));

        let err = status_failure(502, "Bad Gateway".to_string());
        assert!(matches!(err, Error::Status { status: 502, .. }));
    }

    #[test]
    fn display_includes_code_and_description() {
        let err = ApiError {
            error_code: Some(403),
            description: Some("Forbidden: bot was blocked by the user".to_string()),
            parameters: None,
        };
        assert_eq!(
            err.to_string(),
            "Telegram API error 403: Forbidden: bot was blocked by the user"
        );
    }
}
