//! Messages and text entities

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use super::{
    Animation, Audio, Chat, Contact, Dice, Document, InlineKeyboardMarkup, Location, PhotoSize,
    Poll, Sticker, User, Venue, Video, VideoNote, Voice,
};
use crate::decode::{Decode, DecodeError, Object};

/// Special span in a message text: mention, hashtag, command, URL, ...
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageEntity {
    #[serde(rename = "type")]
    pub kind: String,
    /// Offset in UTF-16 code units
    pub offset: usize,
    /// Length in UTF-16 code units
    pub length: usize,
    /// For "text_link" only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// For "text_mention" only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    /// For "pre" only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl MessageEntity {
    /// Slice of `text` covered by this entity
    ///
    /// Offsets are UTF-16 based, so the text is re-encoded to find the span.
    #[must_use]
    pub fn extract(&self, text: &str) -> Option<String> {
        let units: Vec<u16> = text.encode_utf16().collect();
        let end = self.offset.checked_add(self.length)?;
        let span = units.get(self.offset..end)?;
        String::from_utf16(span).ok()
    }
}

impl Decode for MessageEntity {
    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let obj = Object::new("MessageEntity", value)?;
        Ok(Self {
            kind: obj.required("type")?,
            offset: obj.required("offset")?,
            length: obj.required("length")?,
            url: obj.optional("url"),
            user: obj.nested("user"),
            language: obj.optional("language"),
        })
    }
}

/// A message in any chat
///
/// `reply_to_message` and `pinned_message` are decoded one level deep:
/// the embedded message never carries its own reply or pinned message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub message_id: i64,
    /// Unix time
    pub date: i64,
    pub chat: Chat,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<User>,
    /// Sender when the message was sent on behalf of a chat
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_chat: Option<Chat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forward_from: Option<User>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forward_from_chat: Option<Chat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forward_from_message_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forward_signature: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forward_sender_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forward_date: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to_message: Option<Box<Message>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub via_bot: Option<User>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edit_date: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_group_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_signature: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub entities: Vec<MessageEntity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animation: Option<Animation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<Audio>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<Document>,
    /// Available sizes, smallest first
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub photo: Vec<PhotoSize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sticker: Option<Sticker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<Video>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_note: Option<VideoNote>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice: Option<Voice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub caption_entities: Vec<MessageEntity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dice: Option<Dice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poll: Option<Poll>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue: Option<Venue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub new_chat_members: Vec<User>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left_chat_member: Option<User>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_chat_title: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub new_chat_photo: Vec<PhotoSize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete_chat_photo: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_chat_created: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supergroup_chat_created: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_chat_created: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub migrate_to_chat_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub migrate_from_chat_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pinned_message: Option<Box<Message>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<InlineKeyboardMarkup>,
}

impl Message {
    /// Decode a message embedded as a reply or pin target
    pub(crate) fn decode_shallow(value: &Value) -> Result<Self, DecodeError> {
        decode_message(value, false)
    }

    /// Send time as a UTC timestamp
    #[must_use]
    pub fn date_time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.date, 0)
    }

    /// Text, or caption for media messages
    #[must_use]
    pub fn text_or_caption(&self) -> Option<&str> {
        self.text.as_deref().or(self.caption.as_deref())
    }

    /// Largest available photo size
    #[must_use]
    pub fn largest_photo(&self) -> Option<&PhotoSize> {
        self.photo.iter().max_by_key(|p| p.area())
    }

    /// Bot command at the start of the text, without `/` and `@botname`
    ///
    /// Returns the command and the remaining argument text.
    #[must_use]
    pub fn command(&self) -> Option<(String, String)> {
        let text = self.text.as_deref()?;
        let entity = self
            .entities
            .iter()
            .find(|e| e.kind == "bot_command" && e.offset == 0)?;
        let raw = entity.extract(text)?;
        let name = raw
            .trim_start_matches('/')
            .split('@')
            .next()
            .unwrap_or_default()
            .to_string();
        let args = text.get(raw.len()..).unwrap_or_default().trim().to_string();
        Some((name, args))
    }

    /// Whether the message carries any downloadable media
    #[must_use]
    pub fn has_media(&self) -> bool {
        !self.photo.is_empty()
            || self.animation.is_some()
            || self.audio.is_some()
            || self.document.is_some()
            || self.sticker.is_some()
            || self.video.is_some()
            || self.video_note.is_some()
            || self.voice.is_some()
    }
}

impl Decode for Message {
    fn decode(value: &Value) -> Result<Self, DecodeError> {
        decode_message(value, true)
    }
}

fn decode_message(value: &Value, with_children: bool) -> Result<Message, DecodeError> {
    let obj = Object::new("Message", value)?;

    let (reply_to_message, pinned_message) = if with_children {
        (
            obj.nested_with("reply_to_message", Message::decode_shallow)
                .map(Box::new),
            obj.nested_with("pinned_message", Message::decode_shallow)
                .map(Box::new),
        )
    } else {
        (None, None)
    };

    Ok(Message {
        message_id: obj.required("message_id")?,
        date: obj.required("date")?,
        chat: obj.required_nested_with("chat", Chat::decode_embedded)?,
        from: obj.nested("from"),
        sender_chat: obj.nested_with("sender_chat", Chat::decode_embedded),
        forward_from: obj.nested("forward_from"),
        forward_from_chat: obj.nested_with("forward_from_chat", Chat::decode_embedded),
        forward_from_message_id: obj.optional("forward_from_message_id"),
        forward_signature: obj.optional("forward_signature"),
        forward_sender_name: obj.optional("forward_sender_name"),
        forward_date: obj.optional("forward_date"),
        reply_to_message,
        via_bot: obj.nested("via_bot"),
        edit_date: obj.optional("edit_date"),
        media_group_id: obj.optional("media_group_id"),
        author_signature: obj.optional("author_signature"),
        text: obj.optional("text"),
        entities: obj.list("entities"),
        animation: obj.nested("animation"),
        audio: obj.nested("audio"),
        document: obj.nested("document"),
        photo: obj.list("photo"),
        sticker: obj.nested("sticker"),
        video: obj.nested("video"),
        video_note: obj.nested("video_note"),
        voice: obj.nested("voice"),
        caption: obj.optional("caption"),
        caption_entities: obj.list("caption_entities"),
        contact: obj.nested("contact"),
        dice: obj.nested("dice"),
        poll: obj.nested("poll"),
        venue: obj.nested("venue"),
        location: obj.nested("location"),
        new_chat_members: obj.list("new_chat_members"),
        left_chat_member: obj.nested("left_chat_member"),
        new_chat_title: obj.optional("new_chat_title"),
        new_chat_photo: obj.list("new_chat_photo"),
        delete_chat_photo: obj.optional("delete_chat_photo"),
        group_chat_created: obj.optional("group_chat_created"),
        supergroup_chat_created: obj.optional("supergroup_chat_created"),
        channel_chat_created: obj.optional("channel_chat_created"),
        migrate_to_chat_id: obj.optional("migrate_to_chat_id"),
        migrate_from_chat_id: obj.optional("migrate_from_chat_id"),
        pinned_message,
        reply_markup: obj.nested("reply_markup"),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn base() -> Value {
        json!({
            "message_id": 1,
            "date": 1_700_000_000,
            "chat": {"id": 99, "type": "private", "first_name": "Ada"},
            "from": {"id": 99, "is_bot": false, "first_name": "Ada"}
        })
    }

    #[test]
    fn minimal_message() {
        let msg = Message::decode(&base()).unwrap();
        assert_eq!(msg.message_id, 1);
        assert_eq!(msg.chat.id, 99);
        assert_eq!(msg.text, None);
        assert!(msg.photo.is_empty());
        assert!(!msg.has_media());
        assert_eq!(msg.date_time().unwrap().timestamp(), 1_700_000_000);
    }

    #[test]
    fn chat_is_mandatory() {
        let mut value = base();
        value.as_object_mut().unwrap().remove("chat");
        assert_eq!(Message::decode(&value).unwrap_err(), DecodeError::MissingField("chat"));
    }

    #[test]
    fn broken_chat_fails_message() {
        let mut value = base();
        value["chat"] = json!({"id": 99});
        assert_eq!(Message::decode(&value).unwrap_err(), DecodeError::MissingField("type"));
    }

    #[test]
    fn broken_sender_is_dropped() {
        let mut value = base();
        value["from"] = json!({"id": 99});
        let msg = Message::decode(&value).unwrap();
        assert!(msg.from.is_none());
    }

    #[test]
    fn reply_chain_truncated_at_depth_one() {
        let mut value = base();
        let mut reply = base();
        reply["message_id"] = json!(2);
        let mut grandparent = base();
        grandparent["message_id"] = json!(3);
        reply["reply_to_message"] = grandparent.clone();
        reply["pinned_message"] = grandparent;
        value["reply_to_message"] = reply;

        let msg = Message::decode(&value).unwrap();
        let reply = msg.reply_to_message.expect("reply");
        assert_eq!(reply.message_id, 2);
        assert!(reply.reply_to_message.is_none());
        assert!(reply.pinned_message.is_none());
    }

    #[test]
    fn largest_photo_by_area() {
        let mut value = base();
        value["photo"] = json!([
            {"file_id": "s", "file_unique_id": "1", "width": 90, "height": 90},
            {"file_id": "l", "file_unique_id": "3", "width": 1280, "height": 960},
            {"file_id": "m", "file_unique_id": "2", "width": 320, "height": 240}
        ]);
        let msg = Message::decode(&value).unwrap();
        assert!(msg.has_media());
        assert_eq!(msg.largest_photo().unwrap().file_id, "l");
    }

    #[test]
    fn command_parsing() {
        let mut value = base();
        value["text"] = json!("/start@helper_bot deep link");
        value["entities"] = json!([{"type": "bot_command", "offset": 0, "length": 17}]);
        let msg = Message::decode(&value).unwrap();
        assert_eq!(
            msg.command(),
            Some(("start".to_string(), "deep link".to_string()))
        );
    }

    #[test]
    fn entity_offsets_are_utf16() {
        let entity = MessageEntity {
            kind: "bold".to_string(),
            offset: 3,
            length: 5,
            url: None,
            user: None,
            language: None,
        };
        // The emoji takes two UTF-16 units
        assert_eq!(entity.extract("😀 hello").as_deref(), Some("hello"));
    }

    #[test]
    fn new_members_list() {
        let mut value = base();
        value["new_chat_members"] = json!([
            {"id": 1, "is_bot": false, "first_name": "A"},
            {"id": 2, "is_bot": true, "first_name": "B"}
        ]);
        let msg = Message::decode(&value).unwrap();
        assert_eq!(msg.new_chat_members.len(), 2);
        assert!(msg.new_chat_members[1].is_bot);
    }
}
