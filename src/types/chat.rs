//! Chats and chat-level settings

use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::Value;

use super::{Location, Message};
use crate::decode::{Decode, DecodeError, Object};

/// Kind of chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatType {
    Private,
    Group,
    Supergroup,
    Channel,
    /// A type tag this runtime does not know yet
    Other(String),
}

impl ChatType {
    /// Parse the wire tag
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "private" => Self::Private,
            "group" => Self::Group,
            "supergroup" => Self::Supergroup,
            "channel" => Self::Channel,
            other => Self::Other(other.to_string()),
        }
    }

    /// Wire tag
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Private => "private",
            Self::Group => "group",
            Self::Supergroup => "supergroup",
            Self::Channel => "channel",
            Self::Other(tag) => tag,
        }
    }

    /// Group or supergroup
    #[must_use]
    pub const fn is_group(&self) -> bool {
        matches!(self, Self::Group | Self::Supergroup)
    }
}

impl Serialize for ChatType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Target chat for outgoing calls: numeric id or `@channelusername`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatId {
    Id(i64),
    Username(String),
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Username(name) if name.starts_with('@') => f.write_str(name),
            Self::Username(name) => write!(f, "@{name}"),
        }
    }
}

impl From<i64> for ChatId {
    fn from(id: i64) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for ChatId {
    fn from(username: &str) -> Self {
        Self::Username(username.to_string())
    }
}

impl From<String> for ChatId {
    fn from(username: String) -> Self {
        Self::Username(username)
    }
}

impl From<&Chat> for ChatId {
    fn from(chat: &Chat) -> Self {
        Self::Id(chat.id)
    }
}

/// A private chat, group, supergroup or channel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chat {
    /// May exceed 32 bits
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: ChatType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<ChatPhoto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invite_link: Option<String>,
    /// Only present in `getChat`; decoded one level deep
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pinned_message: Option<Box<Message>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<ChatPermissions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slow_mode_delay: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sticker_set_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_set_sticker_set: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linked_chat_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<ChatLocation>,
}

impl Chat {
    /// Decode a chat embedded in a message; never follows `pinned_message`
    pub(crate) fn decode_embedded(value: &Value) -> Result<Self, DecodeError> {
        decode_chat(value, false)
    }

    /// Title for groups and channels, name for private chats
    #[must_use]
    pub fn display_name(&self) -> Option<String> {
        if let Some(title) = &self.title {
            return Some(title.clone());
        }
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => Some(format!("{first} {last}")),
            (Some(first), None) => Some(first.clone()),
            _ => self.username.clone(),
        }
    }
}

impl Decode for Chat {
    fn decode(value: &Value) -> Result<Self, DecodeError> {
        decode_chat(value, true)
    }
}

fn decode_chat(value: &Value, with_pinned: bool) -> Result<Chat, DecodeError> {
    let obj = Object::new("Chat", value)?;
    let tag: String = obj.required("type")?;

    let pinned_message = if with_pinned {
        obj.nested_with("pinned_message", Message::decode_shallow)
            .map(Box::new)
    } else {
        None
    };

    Ok(Chat {
        id: obj.required("id")?,
        kind: ChatType::from_tag(&tag),
        title: obj.optional("title"),
        username: obj.optional("username"),
        first_name: obj.optional("first_name"),
        last_name: obj.optional("last_name"),
        photo: obj.nested("photo"),
        bio: obj.optional("bio"),
        description: obj.optional("description"),
        invite_link: obj.optional("invite_link"),
        pinned_message,
        permissions: obj.nested("permissions"),
        slow_mode_delay: obj.optional("slow_mode_delay"),
        sticker_set_name: obj.optional("sticker_set_name"),
        can_set_sticker_set: obj.optional("can_set_sticker_set"),
        linked_chat_id: obj.optional("linked_chat_id"),
        location: obj.nested("location"),
    })
}

/// Chat photo file ids
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatPhoto {
    pub small_file_id: String,
    pub small_file_unique_id: String,
    pub big_file_id: String,
    pub big_file_unique_id: String,
}

impl Decode for ChatPhoto {
    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let obj = Object::new("ChatPhoto", value)?;
        Ok(Self {
            small_file_id: obj.required("small_file_id")?,
            small_file_unique_id: obj.required("small_file_unique_id")?,
            big_file_id: obj.required("big_file_id")?,
            big_file_unique_id: obj.required("big_file_unique_id")?,
        })
    }
}

/// Actions non-administrators may take in a chat
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChatPermissions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_send_messages: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_send_media_messages: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_send_polls: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_send_other_messages: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_add_web_page_previews: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_change_info: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_invite_users: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_pin_messages: Option<bool>,
}

impl Decode for ChatPermissions {
    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let obj = Object::new("ChatPermissions", value)?;
        Ok(Self {
            can_send_messages: obj.optional("can_send_messages"),
            can_send_media_messages: obj.optional("can_send_media_messages"),
            can_send_polls: obj.optional("can_send_polls"),
            can_send_other_messages: obj.optional("can_send_other_messages"),
            can_add_web_page_previews: obj.optional("can_add_web_page_previews"),
            can_change_info: obj.optional("can_change_info"),
            can_invite_users: obj.optional("can_invite_users"),
            can_pin_messages: obj.optional("can_pin_messages"),
        })
    }
}

/// Location a supergroup is connected to
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatLocation {
    pub location: Location,
    pub address: String,
}

impl Decode for ChatLocation {
    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let obj = Object::new("ChatLocation", value)?;
        Ok(Self {
            location: obj.required_nested("location")?,
            address: obj.required("address")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn wide_ids_survive() {
        let chat = Chat::decode(&json!({"id": -1_001_234_567_890_i64, "type": "supergroup"})).unwrap();
        assert_eq!(chat.id, -1_001_234_567_890);
        assert!(chat.kind.is_group());
    }

    #[test]
    fn type_is_mandatory() {
        let err = Chat::decode(&json!({"id": 5})).unwrap_err();
        assert_eq!(err, DecodeError::MissingField("type"));
    }

    #[test]
    fn unknown_type_tag_is_kept() {
        let chat = Chat::decode(&json!({"id": 5, "type": "sender"})).unwrap();
        assert_eq!(chat.kind, ChatType::Other("sender".to_string()));
        assert_eq!(chat.kind.as_str(), "sender");
    }

    #[test]
    fn pinned_message_is_shallow() {
        let chat = Chat::decode(&json!({
            "id": 7,
            "type": "group",
            "title": "Crew",
            "pinned_message": {
                "message_id": 10,
                "date": 1_600_000_000,
                "chat": {"id": 7, "type": "group"},
                "reply_to_message": {
                    "message_id": 9,
                    "date": 1_600_000_000,
                    "chat": {"id": 7, "type": "group"}
                }
            }
        }))
        .unwrap();

        let pinned = chat.pinned_message.expect("pinned message");
        assert_eq!(pinned.message_id, 10);
        assert!(pinned.reply_to_message.is_none());
    }

    #[test]
    fn chat_id_display() {
        assert_eq!(ChatId::from(-100_i64).to_string(), "-100");
        assert_eq!(ChatId::from("news").to_string(), "@news");
        assert_eq!(ChatId::from("@news").to_string(), "@news");
    }

    #[test]
    fn display_name_prefers_title() {
        let chat = Chat::decode(&json!({"id": 1, "type": "private", "first_name": "Ada", "last_name": "L"})).unwrap();
        assert_eq!(chat.display_name().as_deref(), Some("Ada L"));
    }
}
