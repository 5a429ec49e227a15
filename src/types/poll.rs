//! Polls and poll answers

use serde::Serialize;
use serde_json::Value;

use super::{MessageEntity, User};
use crate::decode::{Decode, DecodeError, Object};

/// One answer option of a poll
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PollOption {
    pub text: String,
    pub voter_count: u32,
}

impl Decode for PollOption {
    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let obj = Object::new("PollOption", value)?;
        Ok(Self {
            text: obj.required("text")?,
            voter_count: obj.required("voter_count")?,
        })
    }
}

/// Poll state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Poll {
    pub id: String,
    pub question: String,
    pub options: Vec<PollOption>,
    pub total_voter_count: u32,
    pub is_closed: bool,
    pub is_anonymous: bool,
    /// "regular" or "quiz"
    #[serde(rename = "type")]
    pub kind: String,
    pub allows_multiple_answers: bool,
    /// Quiz only, and only for closed polls or polls sent by the bot
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_option_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub explanation_entities: Vec<MessageEntity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_period: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close_date: Option<i64>,
}

impl Poll {
    /// Whether this poll is a quiz
    #[must_use]
    pub fn is_quiz(&self) -> bool {
        self.kind == "quiz"
    }
}

impl Decode for Poll {
    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let obj = Object::new("Poll", value)?;
        Ok(Self {
            id: obj.required("id")?,
            question: obj.required("question")?,
            options: obj.required_list("options")?,
            total_voter_count: obj.required("total_voter_count")?,
            is_closed: obj.required("is_closed")?,
            is_anonymous: obj.required("is_anonymous")?,
            kind: obj.required("type")?,
            allows_multiple_answers: obj.required("allows_multiple_answers")?,
            correct_option_id: obj.optional("correct_option_id"),
            explanation: obj.optional("explanation"),
            explanation_entities: obj.list("explanation_entities"),
            open_period: obj.optional("open_period"),
            close_date: obj.optional("close_date"),
        })
    }
}

/// A user's vote in a non-anonymous poll
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PollAnswer {
    pub poll_id: String,
    pub user: User,
    /// Empty when the vote was retracted
    pub option_ids: Vec<u32>,
}

impl Decode for PollAnswer {
    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let obj = Object::new("PollAnswer", value)?;
        Ok(Self {
            poll_id: obj.required("poll_id")?,
            user: obj.required_nested("user")?,
            option_ids: obj.required("option_ids")?,
        })
    }
}
