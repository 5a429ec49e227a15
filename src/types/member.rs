//! Chat membership

use serde::Serialize;
use serde_json::Value;

use super::{Chat, User};
use crate::decode::{Decode, DecodeError, Object};

/// A user's membership in a chat
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMember {
    pub user: User,
    /// "creator", "administrator", "member", "restricted", "left" or "kicked"
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_anonymous: Option<bool>,
    /// Unix time when restrictions are lifted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub until_date: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_be_edited: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_manage_chat: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_post_messages: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_edit_messages: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_delete_messages: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_restrict_members: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_promote_members: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_change_info: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_invite_users: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_pin_messages: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_member: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_send_messages: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_send_media_messages: Option<bool>,
}

impl ChatMember {
    /// Creator or administrator
    #[must_use]
    pub fn is_admin(&self) -> bool {
        matches!(self.status.as_str(), "creator" | "administrator")
    }

    /// Still in the chat (restricted members count when `is_member` is set)
    #[must_use]
    pub fn is_present(&self) -> bool {
        match self.status.as_str() {
            "left" | "kicked" => false,
            "restricted" => self.is_member.unwrap_or(false),
            _ => true,
        }
    }
}

impl Decode for ChatMember {
    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let obj = Object::new("ChatMember", value)?;
        Ok(Self {
            user: obj.required_nested("user")?,
            status: obj.required("status")?,
            custom_title: obj.optional("custom_title"),
            is_anonymous: obj.optional("is_anonymous"),
            until_date: obj.optional("until_date"),
            can_be_edited: obj.optional("can_be_edited"),
            can_manage_chat: obj.optional("can_manage_chat"),
            can_post_messages: obj.optional("can_post_messages"),
            can_edit_messages: obj.optional("can_edit_messages"),
            can_delete_messages: obj.optional("can_delete_messages"),
            can_restrict_members: obj.optional("can_restrict_members"),
            can_promote_members: obj.optional("can_promote_members"),
            can_change_info: obj.optional("can_change_info"),
            can_invite_users: obj.optional("can_invite_users"),
            can_pin_messages: obj.optional("can_pin_messages"),
            is_member: obj.optional("is_member"),
            can_send_messages: obj.optional("can_send_messages"),
            can_send_media_messages: obj.optional("can_send_media_messages"),
        })
    }
}

/// Invite link for a chat
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatInviteLink {
    pub invite_link: String,
    pub creator: User,
    pub is_primary: bool,
    pub is_revoked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expire_date: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_limit: Option<u32>,
}

impl Decode for ChatInviteLink {
    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let obj = Object::new("ChatInviteLink", value)?;
        Ok(Self {
            invite_link: obj.required("invite_link")?,
            creator: obj.required_nested("creator")?,
            is_primary: obj.required("is_primary")?,
            is_revoked: obj.required("is_revoked")?,
            expire_date: obj.optional("expire_date"),
            member_limit: obj.optional("member_limit"),
        })
    }
}

/// Change of a member's status in a chat
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMemberUpdated {
    pub chat: Chat,
    pub from: User,
    pub date: i64,
    pub old_chat_member: ChatMember,
    pub new_chat_member: ChatMember,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invite_link: Option<ChatInviteLink>,
}

impl Decode for ChatMemberUpdated {
    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let obj = Object::new("ChatMemberUpdated", value)?;
        Ok(Self {
            chat: obj.required_nested_with("chat", Chat::decode_embedded)?,
            from: obj.required_nested("from")?,
            date: obj.required("date")?,
            old_chat_member: obj.required_nested("old_chat_member")?,
            new_chat_member: obj.required_nested("new_chat_member")?,
            invite_link: obj.nested("invite_link"),
        })
    }
}
