//! Telegram user or bot account

use serde::Serialize;
use serde_json::Value;

use crate::decode::{Decode, DecodeError, Object};

/// A Telegram user or bot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: i64,
    pub is_bot: bool,
    pub first_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// IETF language tag of the user's client
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
    /// Only returned by `getMe`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_join_groups: Option<bool>,
    /// Only returned by `getMe`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_read_all_group_messages: Option<bool>,
    /// Only returned by `getMe`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supports_inline_queries: Option<bool>,
}

impl User {
    /// First and last name joined with a space
    #[must_use]
    pub fn full_name(&self) -> String {
        match &self.last_name {
            Some(last) => format!("{} {last}", self.first_name),
            None => self.first_name.clone(),
        }
    }

    /// `@username` mention, if the user has a username
    #[must_use]
    pub fn mention(&self) -> Option<String> {
        self.username.as_ref().map(|u| format!("@{u}"))
    }
}

impl Decode for User {
    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let obj = Object::new("User", value)?;
        Ok(Self {
            id: obj.required("id")?,
            is_bot: obj.required("is_bot")?,
            first_name: obj.required("first_name")?,
            last_name: obj.optional("last_name"),
            username: obj.optional("username"),
            language_code: obj.optional("language_code"),
            can_join_groups: obj.optional("can_join_groups"),
            can_read_all_group_messages: obj.optional("can_read_all_group_messages"),
            supports_inline_queries: obj.optional("supports_inline_queries"),
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn decodes_self_query_flags() {
        let user = User::decode(&json!({
            "id": 42,
            "is_bot": true,
            "first_name": "Helper",
            "username": "helper_bot",
            "can_join_groups": true,
            "can_read_all_group_messages": false,
            "supports_inline_queries": false
        }))
        .unwrap();

        assert_eq!(user.can_join_groups, Some(true));
        assert_eq!(user.can_read_all_group_messages, Some(false));
        assert_eq!(user.mention().as_deref(), Some("@helper_bot"));
    }

    #[test]
    fn mandatory_fields() {
        for field in ["id", "is_bot", "first_name"] {
            let mut value = json!({"id": 1, "is_bot": false, "first_name": "A"});
            value.as_object_mut().unwrap().remove(field);
            assert_eq!(User::decode(&value).unwrap_err(), DecodeError::MissingField(field));
        }
    }

    #[test]
    fn full_name_joins_parts() {
        let user = User::decode(&json!({
            "id": 1, "is_bot": false, "first_name": "Ada", "last_name": "Lovelace"
        }))
        .unwrap();
        assert_eq!(user.full_name(), "Ada Lovelace");
    }
}
