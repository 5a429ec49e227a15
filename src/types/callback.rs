//! Callback and inline queries

use serde::Serialize;
use serde_json::Value;

use super::{Location, Message, User};
use crate::decode::{Decode, DecodeError, Object};

/// Press of an inline keyboard button
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    /// Absent when the message is too old or was sent via inline mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_message_id: Option<String>,
    pub chat_instance: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_short_name: Option<String>,
}

impl Decode for CallbackQuery {
    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let obj = Object::new("CallbackQuery", value)?;
        Ok(Self {
            id: obj.required("id")?,
            from: obj.required_nested("from")?,
            message: obj.nested("message"),
            inline_message_id: obj.optional("inline_message_id"),
            chat_instance: obj.required("chat_instance")?,
            data: obj.optional("data"),
            game_short_name: obj.optional("game_short_name"),
        })
    }
}

/// Incoming inline query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InlineQuery {
    pub id: String,
    pub from: User,
    pub query: String,
    /// Pagination offset controlled by the bot
    pub offset: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl Decode for InlineQuery {
    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let obj = Object::new("InlineQuery", value)?;
        Ok(Self {
            id: obj.required("id")?,
            from: obj.required_nested("from")?,
            query: obj.required("query")?,
            offset: obj.required("offset")?,
            location: obj.nested("location"),
        })
    }
}

/// Inline result chosen by a user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChosenInlineResult {
    pub result_id: String,
    pub from: User,
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_message_id: Option<String>,
}

impl Decode for ChosenInlineResult {
    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let obj = Object::new("ChosenInlineResult", value)?;
        Ok(Self {
            result_id: obj.required("result_id")?,
            from: obj.required_nested("from")?,
            query: obj.required("query")?,
            location: obj.nested("location"),
            inline_message_id: obj.optional("inline_message_id"),
        })
    }
}
