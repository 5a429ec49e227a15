//! Webhook status

use serde::Serialize;
use serde_json::Value;

use crate::decode::{Decode, DecodeError, Object};

/// Current webhook configuration; `url` is empty when polling
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookInfo {
    pub url: String,
    pub has_custom_certificate: bool,
    pub pending_update_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error_date: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_connections: Option<u32>,
    /// `None` means the field was omitted, i.e. all update types except
    /// `chat_member`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_updates: Option<Vec<String>>,
}

impl WebhookInfo {
    /// Whether a webhook is registered (which blocks `getUpdates`)
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.url.is_empty()
    }
}

impl Decode for WebhookInfo {
    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let obj = Object::new("WebhookInfo", value)?;
        Ok(Self {
            url: obj.required("url")?,
            has_custom_certificate: obj.required("has_custom_certificate")?,
            pending_update_count: obj.required("pending_update_count")?,
            ip_address: obj.optional("ip_address"),
            last_error_date: obj.optional("last_error_date"),
            last_error_message: obj.optional("last_error_message"),
            max_connections: obj.optional("max_connections"),
            allowed_updates: obj.list_opt("allowed_updates"),
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn allowed_updates_presence() {
        let base = json!({"url": "", "has_custom_certificate": false, "pending_update_count": 0});
        let info = WebhookInfo::decode(&base).unwrap();
        assert_eq!(info.allowed_updates, None);
        assert!(!info.is_active());

        let mut with_empty = base;
        with_empty["allowed_updates"] = json!([]);
        let info = WebhookInfo::decode(&with_empty).unwrap();
        assert_eq!(info.allowed_updates, Some(vec![]));
    }
}
