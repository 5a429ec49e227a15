//! Flow-control parameters attached to failed responses

use serde::Serialize;
use serde_json::Value;

use crate::decode::{Decode, DecodeError, Object};

/// Why a request failed and how to recover
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseParameters {
    /// The group has been migrated to a supergroup with this id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub migrate_to_chat_id: Option<i64>,
    /// Seconds to wait before repeating the request (flood control)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<u64>,
}

impl Decode for ResponseParameters {
    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let obj = Object::new("ResponseParameters", value)?;
        Ok(Self {
            migrate_to_chat_id: obj.optional("migrate_to_chat_id"),
            retry_after: obj.optional("retry_after"),
        })
    }
}
