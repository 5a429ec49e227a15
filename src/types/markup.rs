//! Inline keyboards and bot commands
//!
//! These travel both ways: decoded from incoming messages and serialized
//! into `reply_markup` / `commands` request fields.

use serde::Serialize;
use serde_json::Value;

use crate::decode::{Decode, DecodeError, Object};

/// Inline keyboard markup for message buttons
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

impl InlineKeyboardMarkup {
    /// Empty keyboard
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row of buttons
    #[must_use]
    pub fn row(mut self, buttons: Vec<InlineKeyboardButton>) -> Self {
        self.inline_keyboard.push(buttons);
        self
    }
}

impl Decode for InlineKeyboardMarkup {
    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let obj = Object::new("InlineKeyboardMarkup", value)?;
        Ok(Self {
            inline_keyboard: obj.required_grid("inline_keyboard")?,
        })
    }
}

/// A button in an inline keyboard row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub switch_inline_query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub switch_inline_query_current_chat: Option<String>,
}

impl InlineKeyboardButton {
    /// Button that sends `data` back in a callback query
    #[must_use]
    pub fn callback(text: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: None,
            callback_data: Some(data.into()),
            switch_inline_query: None,
            switch_inline_query_current_chat: None,
        }
    }

    /// Button that opens `url`
    #[must_use]
    pub fn url(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: Some(url.into()),
            callback_data: None,
            switch_inline_query: None,
            switch_inline_query_current_chat: None,
        }
    }
}

impl Decode for InlineKeyboardButton {
    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let obj = Object::new("InlineKeyboardButton", value)?;
        Ok(Self {
            text: obj.required("text")?,
            url: obj.optional("url"),
            callback_data: obj.optional("callback_data"),
            switch_inline_query: obj.optional("switch_inline_query"),
            switch_inline_query_current_chat: obj.optional("switch_inline_query_current_chat"),
        })
    }
}

/// A bot command for Telegram's command menu
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BotCommand {
    /// 1-32 characters, lowercase letters, digits and underscores
    pub command: String,
    /// 3-256 characters
    pub description: String,
}

impl BotCommand {
    #[must_use]
    pub fn new(command: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            description: description.into(),
        }
    }
}

impl Decode for BotCommand {
    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let obj = Object::new("BotCommand", value)?;
        Ok(Self {
            command: obj.required("command")?,
            description: obj.required("description")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn serializes_without_empty_fields() {
        let markup = InlineKeyboardMarkup::new().row(vec![
            InlineKeyboardButton::callback("Yes", "vote:yes"),
            InlineKeyboardButton::url("Docs", "https://core.telegram.org/bots/api"),
        ]);

        let value = serde_json::to_value(&markup).unwrap();
        assert_eq!(
            value,
            json!({"inline_keyboard": [[
                {"text": "Yes", "callback_data": "vote:yes"},
                {"text": "Docs", "url": "https://core.telegram.org/bots/api"}
            ]]})
        );
    }
}
