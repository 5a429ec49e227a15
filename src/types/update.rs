//! Incoming updates and their variant dispatch

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use super::{
    CallbackQuery, Chat, ChatMemberUpdated, ChosenInlineResult, InlineQuery, Message, Poll,
    PollAnswer, User,
};
use crate::decode::{Decode, DecodeError, Object};

/// Update variant key, as used in `allowed_updates`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateType {
    Message,
    EditedMessage,
    ChannelPost,
    EditedChannelPost,
    InlineQuery,
    ChosenInlineResult,
    CallbackQuery,
    Poll,
    PollAnswer,
    MyChatMember,
    ChatMember,
}

/// Order in which variant keys are tested; the first key present wins
///
/// Well-formed updates carry exactly one key. For malformed ones holding
/// several, this order decides the variant.
pub const UPDATE_PRECEDENCE: [UpdateType; 11] = [
    UpdateType::Message,
    UpdateType::EditedMessage,
    UpdateType::ChannelPost,
    UpdateType::EditedChannelPost,
    UpdateType::InlineQuery,
    UpdateType::ChosenInlineResult,
    UpdateType::CallbackQuery,
    UpdateType::Poll,
    UpdateType::PollAnswer,
    UpdateType::MyChatMember,
    UpdateType::ChatMember,
];

impl UpdateType {
    /// JSON key carrying this variant
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Message => "message",
            Self::EditedMessage => "edited_message",
            Self::ChannelPost => "channel_post",
            Self::EditedChannelPost => "edited_channel_post",
            Self::InlineQuery => "inline_query",
            Self::ChosenInlineResult => "chosen_inline_result",
            Self::CallbackQuery => "callback_query",
            Self::Poll => "poll",
            Self::PollAnswer => "poll_answer",
            Self::MyChatMember => "my_chat_member",
            Self::ChatMember => "chat_member",
        }
    }

    /// Parse a variant key
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        UPDATE_PRECEDENCE.into_iter().find(|t| t.key() == key)
    }

    /// First variant key present in `obj`, following [`UPDATE_PRECEDENCE`]
    fn discriminate(obj: &Object<'_>) -> Option<Self> {
        UPDATE_PRECEDENCE.into_iter().find(|t| obj.has(t.key()))
    }
}

/// Payload of an update
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateKind {
    Message(Message),
    EditedMessage(Message),
    ChannelPost(Message),
    EditedChannelPost(Message),
    InlineQuery(InlineQuery),
    ChosenInlineResult(ChosenInlineResult),
    CallbackQuery(CallbackQuery),
    Poll(Poll),
    PollAnswer(PollAnswer),
    MyChatMember(ChatMemberUpdated),
    ChatMember(ChatMemberUpdated),
    /// Variant this runtime does not model, or whose payload failed to
    /// decode; the raw update object is kept so the offset still moves past it
    Unknown(Value),
}

impl UpdateKind {
    fn decode_as(kind: UpdateType, obj: &Object<'_>) -> Result<Self, DecodeError> {
        let key = kind.key();
        Ok(match kind {
            UpdateType::Message => Self::Message(obj.required_nested(key)?),
            UpdateType::EditedMessage => Self::EditedMessage(obj.required_nested(key)?),
            UpdateType::ChannelPost => Self::ChannelPost(obj.required_nested(key)?),
            UpdateType::EditedChannelPost => Self::EditedChannelPost(obj.required_nested(key)?),
            UpdateType::InlineQuery => Self::InlineQuery(obj.required_nested(key)?),
            UpdateType::ChosenInlineResult => Self::ChosenInlineResult(obj.required_nested(key)?),
            UpdateType::CallbackQuery => Self::CallbackQuery(obj.required_nested(key)?),
            UpdateType::Poll => Self::Poll(obj.required_nested(key)?),
            UpdateType::PollAnswer => Self::PollAnswer(obj.required_nested(key)?),
            UpdateType::MyChatMember => Self::MyChatMember(obj.required_nested(key)?),
            UpdateType::ChatMember => Self::ChatMember(obj.required_nested(key)?),
        })
    }

    /// Variant tag, `None` for [`UpdateKind::Unknown`]
    #[must_use]
    pub const fn update_type(&self) -> Option<UpdateType> {
        Some(match self {
            Self::Message(_) => UpdateType::Message,
            Self::EditedMessage(_) => UpdateType::EditedMessage,
            Self::ChannelPost(_) => UpdateType::ChannelPost,
            Self::EditedChannelPost(_) => UpdateType::EditedChannelPost,
            Self::InlineQuery(_) => UpdateType::InlineQuery,
            Self::ChosenInlineResult(_) => UpdateType::ChosenInlineResult,
            Self::CallbackQuery(_) => UpdateType::CallbackQuery,
            Self::Poll(_) => UpdateType::Poll,
            Self::PollAnswer(_) => UpdateType::PollAnswer,
            Self::MyChatMember(_) => UpdateType::MyChatMember,
            Self::ChatMember(_) => UpdateType::ChatMember,
            Self::Unknown(_) => return None,
        })
    }
}

/// One event delivered by the platform
///
/// Serializes back to the wire shape; an [`UpdateKind::Unknown`] update is
/// emitted as the raw object it was decoded from.
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    /// Strictly increasing identifier, used for the polling offset
    pub id: i64,
    pub kind: UpdateKind,
}

impl Serialize for Update {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Wire<'a> {
            update_id: i64,
            #[serde(flatten)]
            kind: &'a UpdateKind,
        }

        match &self.kind {
            UpdateKind::Unknown(raw) => raw.serialize(serializer),
            kind => Wire {
                update_id: self.id,
                kind,
            }
            .serialize(serializer),
        }
    }
}

impl Update {
    /// Message for message-like variants (new or edited, private or channel)
    #[must_use]
    pub fn message(&self) -> Option<&Message> {
        match &self.kind {
            UpdateKind::Message(m)
            | UpdateKind::EditedMessage(m)
            | UpdateKind::ChannelPost(m)
            | UpdateKind::EditedChannelPost(m) => Some(m),
            UpdateKind::CallbackQuery(q) => q.message.as_ref(),
            _ => None,
        }
    }

    /// Chat the update happened in, when there is one
    #[must_use]
    pub fn chat(&self) -> Option<&Chat> {
        match &self.kind {
            UpdateKind::MyChatMember(m) | UpdateKind::ChatMember(m) => Some(&m.chat),
            _ => self.message().map(|m| &m.chat),
        }
    }

    /// User who caused the update, when known
    #[must_use]
    pub fn sender(&self) -> Option<&User> {
        match &self.kind {
            UpdateKind::InlineQuery(q) => Some(&q.from),
            UpdateKind::ChosenInlineResult(r) => Some(&r.from),
            UpdateKind::CallbackQuery(q) => Some(&q.from),
            UpdateKind::PollAnswer(a) => Some(&a.user),
            UpdateKind::MyChatMember(m) | UpdateKind::ChatMember(m) => Some(&m.from),
            UpdateKind::Poll(_) | UpdateKind::Unknown(_) => None,
            _ => self.message().and_then(|m| m.from.as_ref()),
        }
    }
}

impl Decode for Update {
    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let obj = Object::new("Update", value)?;
        let id: i64 = obj.required("update_id")?;

        let kind = match UpdateType::discriminate(&obj) {
            Some(kind) => UpdateKind::decode_as(kind, &obj).unwrap_or_else(|e| {
                tracing::warn!(
                    update_id = id,
                    kind = kind.key(),
                    error = %e,
                    "undecodable update payload"
                );
                UpdateKind::Unknown(value.clone())
            }),
            None => {
                tracing::debug!(update_id = id, "update of unmodelled type");
                UpdateKind::Unknown(value.clone())
            }
        };

        Ok(Self { id, kind })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn message() -> Value {
        json!({
            "message_id": 5,
            "date": 1_700_000_000,
            "chat": {"id": 1, "type": "private"},
            "text": "hi"
        })
    }

    fn poll() -> Value {
        json!({
            "id": "p", "question": "?", "options": [], "total_voter_count": 0,
            "is_closed": true, "is_anonymous": true, "type": "regular",
            "allows_multiple_answers": false
        })
    }

    #[test]
    fn precedence_covers_every_type_once() {
        for (i, kind) in UPDATE_PRECEDENCE.iter().enumerate() {
            assert_eq!(UpdateType::from_key(kind.key()), Some(*kind));
            assert!(!UPDATE_PRECEDENCE[i + 1..].contains(kind));
        }
    }

    #[test]
    fn precedence_starts_with_messages() {
        let keys: Vec<&str> = UPDATE_PRECEDENCE.iter().map(|t| t.key()).collect();
        assert_eq!(
            &keys[..7],
            &[
                "message",
                "edited_message",
                "channel_post",
                "edited_channel_post",
                "inline_query",
                "chosen_inline_result",
                "callback_query"
            ]
        );
        assert!(keys.iter().position(|k| *k == "poll") < keys.iter().position(|k| *k == "poll_answer"));
    }

    #[test]
    fn message_wins_over_poll() {
        let update = Update::decode(&json!({"update_id": 1, "poll": poll(), "message": message()})).unwrap();
        assert!(matches!(update.kind, UpdateKind::Message(_)));
    }

    #[test]
    fn poll_alone() {
        let update = Update::decode(&json!({"update_id": 2, "poll": poll()})).unwrap();
        assert_eq!(update.kind.update_type(), Some(UpdateType::Poll));
    }

    #[test]
    fn edited_channel_post() {
        let update = Update::decode(&json!({"update_id": 3, "edited_channel_post": message()})).unwrap();
        assert!(matches!(update.kind, UpdateKind::EditedChannelPost(_)));
        assert_eq!(update.chat().unwrap().id, 1);
    }

    #[test]
    fn unknown_key_is_preserved() {
        let raw = json!({"update_id": 4, "shipping_query": {"id": "s"}});
        let update = Update::decode(&raw).unwrap();
        assert_eq!(update.id, 4);
        assert_eq!(update.kind, UpdateKind::Unknown(raw));
    }

    #[test]
    fn broken_payload_becomes_unknown() {
        let update = Update::decode(&json!({"update_id": 5, "message": {"message_id": 1}})).unwrap();
        assert_eq!(update.id, 5);
        assert!(matches!(update.kind, UpdateKind::Unknown(_)));
    }

    #[test]
    fn update_id_is_mandatory() {
        let err = Update::decode(&json!({"message": message()})).unwrap_err();
        assert_eq!(err, DecodeError::MissingField("update_id"));
    }

    #[test]
    fn allowed_updates_serialize_as_keys() {
        let value = serde_json::to_value([UpdateType::Message, UpdateType::CallbackQuery]).unwrap();
        assert_eq!(value, json!(["message", "callback_query"]));
    }

    #[test]
    fn serializes_with_variant_key() {
        let update = Update::decode(&json!({"update_id": 9, "message": message()})).unwrap();
        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(value["update_id"], json!(9));
        assert_eq!(value["message"]["text"], json!("hi"));
    }

    #[test]
    fn unknown_serializes_as_received() {
        let raw = json!({"update_id": 4, "shipping_query": {"id": "s"}});
        let update = Update::decode(&raw).unwrap();
        assert_eq!(serde_json::to_value(&update).unwrap(), raw);
    }

    #[test]
    fn sender_of_callback() {
        let update = Update::decode(&json!({
            "update_id": 10,
            "callback_query": {
                "id": "q",
                "from": {"id": 77, "is_bot": false, "first_name": "Kim"},
                "chat_instance": "c",
                "message": message()
            }
        }))
        .unwrap();
        assert_eq!(update.sender().unwrap().id, 77);
        assert_eq!(update.chat().unwrap().id, 1);
    }
}
