//! Bot API methods

use std::path::Path;
use std::time::Duration;

use serde::Serialize;
use tokio::io::AsyncWrite;

use super::Bot;
use crate::transport::Request;
use crate::types::{
    BotCommand, ChatId, File, InlineKeyboardMarkup, Message, Update, UpdateType, User,
    UserProfilePhotos, WebhookInfo,
};
use crate::{Error, Result};

/// Largest batch `getUpdates` will return
const MAX_UPDATES_LIMIT: u8 = 100;

/// Text formatting applied by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    Html,
    Markdown,
    MarkdownV2,
}

impl ParseMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Html => "HTML",
            Self::Markdown => "Markdown",
            Self::MarkdownV2 => "MarkdownV2",
        }
    }
}

/// Status shown to chat members while the bot prepares a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatAction {
    Typing,
    UploadPhoto,
    RecordVideo,
    UploadVideo,
    RecordVoice,
    UploadVoice,
    UploadDocument,
    ChooseSticker,
    FindLocation,
    RecordVideoNote,
    UploadVideoNote,
}

impl ChatAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Typing => "typing",
            Self::UploadPhoto => "upload_photo",
            Self::RecordVideo => "record_video",
            Self::UploadVideo => "upload_video",
            Self::RecordVoice => "record_voice",
            Self::UploadVoice => "upload_voice",
            Self::UploadDocument => "upload_document",
            Self::ChooseSticker => "choose_sticker",
            Self::FindLocation => "find_location",
            Self::RecordVideoNote => "record_video_note",
            Self::UploadVideoNote => "upload_video_note",
        }
    }
}

/// Optional parameters shared by the send methods
#[derive(Debug, Clone, Default)]
pub struct SendOptions {
    pub parse_mode: Option<ParseMode>,
    pub disable_notification: bool,
    pub reply_to_message_id: Option<i64>,
    pub reply_markup: Option<InlineKeyboardMarkup>,
}

impl SendOptions {
    fn apply(&self, request: Request) -> Result<Request> {
        request
            .opt_text("parse_mode", self.parse_mode.map(ParseMode::as_str))
            .opt_text(
                "disable_notification",
                self.disable_notification.then_some(true),
            )
            .opt_text("reply_to_message_id", self.reply_to_message_id)
            .opt_json("reply_markup", self.reply_markup.as_ref())
    }
}

/// Parameters of a `getUpdates` call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetUpdates {
    /// First update id to return; earlier updates are confirmed and dropped
    pub offset: Option<i64>,
    /// Batch size, 1 to 100
    pub limit: Option<u8>,
    /// Long-poll wait; `None` or zero returns immediately
    pub timeout: Option<Duration>,
    /// `None` omits the field, an empty list asks for all default types
    pub allowed_updates: Option<Vec<UpdateType>>,
}

impl GetUpdates {
    /// Build the request
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if `limit` is outside 1 to 100
    pub fn to_request(&self) -> Result<Request> {
        if let Some(limit) = self.limit {
            if !(1..=MAX_UPDATES_LIMIT).contains(&limit) {
                return Err(Error::InvalidParameter(format!(
                    "getUpdates limit must be within 1..={MAX_UPDATES_LIMIT}, got {limit}"
                )));
            }
        }

        let mut request = Request::new("getUpdates")
            .opt_text("offset", self.offset)
            .opt_text("limit", self.limit)
            .opt_text("timeout", self.timeout.map(|t| t.as_secs()))
            .opt_json("allowed_updates", self.allowed_updates.as_ref())?;

        if let Some(wait) = self.timeout.filter(|t| !t.is_zero()) {
            request = request.long_poll(wait);
        }
        Ok(request)
    }
}

fn require(name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::InvalidParameter(format!("`{name}` must not be empty")));
    }
    Ok(())
}

impl Bot {
    /// Identity of the bot behind the token
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails
    pub async fn get_me(&self) -> Result<User> {
        self.call(Request::new("getMe")).await
    }

    /// Fetch a batch of updates
    ///
    /// # Errors
    ///
    /// Returns error if the parameters are invalid or the API request fails
    pub async fn get_updates(&self, params: &GetUpdates) -> Result<Vec<Update>> {
        self.call(params.to_request()?).await
    }

    /// Remove the webhook so `getUpdates` can be used
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails
    pub async fn delete_webhook(&self, drop_pending_updates: bool) -> Result<bool> {
        let request = Request::new("deleteWebhook")
            .opt_text("drop_pending_updates", drop_pending_updates.then_some(true));
        self.call(request).await
    }

    /// Current webhook status
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails
    pub async fn get_webhook_info(&self) -> Result<WebhookInfo> {
        self.call(Request::new("getWebhookInfo")).await
    }

    /// Send a text message
    ///
    /// # Errors
    ///
    /// Returns error if `text` is empty or the API request fails
    pub async fn send_message(
        &self,
        chat_id: impl Into<ChatId>,
        text: &str,
        options: &SendOptions,
    ) -> Result<Message> {
        require("text", text)?;
        let chat_id: ChatId = chat_id.into();
        let request = Request::new("sendMessage")
            .text("chat_id", chat_id)
            .text("text", text);
        self.call(options.apply(request)?).await
    }

    /// Upload a local file as a document
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or the API request fails
    pub async fn send_document(
        &self,
        chat_id: impl Into<ChatId>,
        document: impl AsRef<Path>,
        caption: Option<&str>,
        options: &SendOptions,
    ) -> Result<Message> {
        let document = document.as_ref();
        if document.as_os_str().is_empty() {
            return Err(Error::InvalidParameter("`document` path is empty".to_string()));
        }
        let chat_id: ChatId = chat_id.into();
        let request = Request::new("sendDocument")
            .text("chat_id", chat_id)
            .file("document", document)
            .opt_text("caption", caption);
        self.call(options.apply(request)?).await
    }

    /// Show a chat action such as "typing..." for a few seconds
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails
    pub async fn send_chat_action(
        &self,
        chat_id: impl Into<ChatId>,
        action: ChatAction,
    ) -> Result<bool> {
        let chat_id: ChatId = chat_id.into();
        let request = Request::new("sendChatAction")
            .text("chat_id", chat_id)
            .text("action", action.as_str());
        self.call(request).await
    }

    /// Forward a message from one chat to another
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails
    pub async fn forward_message(
        &self,
        chat_id: impl Into<ChatId>,
        from_chat_id: impl Into<ChatId>,
        message_id: i64,
        disable_notification: bool,
    ) -> Result<Message> {
        let (chat_id, from_chat_id): (ChatId, ChatId) = (chat_id.into(), from_chat_id.into());
        let request = Request::new("forwardMessage")
            .text("chat_id", chat_id)
            .text("from_chat_id", from_chat_id)
            .text("message_id", message_id)
            .opt_text("disable_notification", disable_notification.then_some(true));
        self.call(request).await
    }

    /// Acknowledge a callback query, optionally with a notification
    ///
    /// # Errors
    ///
    /// Returns error if `callback_query_id` is empty or the API request fails
    pub async fn answer_callback_query(
        &self,
        callback_query_id: &str,
        text: Option<&str>,
        show_alert: bool,
    ) -> Result<bool> {
        require("callback_query_id", callback_query_id)?;
        let request = Request::new("answerCallbackQuery")
            .text("callback_query_id", callback_query_id)
            .opt_text("text", text)
            .opt_text("show_alert", show_alert.then_some(true));
        self.call(request).await
    }

    /// Resolve a file id to a downloadable [`File`]
    ///
    /// # Errors
    ///
    /// Returns error if `file_id` is empty or the API request fails
    pub async fn get_file(&self, file_id: &str) -> Result<File> {
        require("file_id", file_id)?;
        self.call(Request::new("getFile").text("file_id", file_id))
            .await
    }

    /// Stream the contents of `file` into `sink`, returning bytes written
    ///
    /// # Errors
    ///
    /// Returns error if `file` has no `file_path` or the download fails
    pub async fn download_file(
        &self,
        file: &File,
        sink: &mut (dyn AsyncWrite + Unpin + Send),
    ) -> Result<u64> {
        self.ensure_open()?;
        let path = file.file_path.as_deref().ok_or_else(|| {
            Error::InvalidParameter(format!("file `{}` has no file_path", file.file_id))
        })?;
        self.transport().download(path, sink).await
    }

    /// A user's profile pictures
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails
    pub async fn get_user_profile_photos(
        &self,
        user_id: i64,
        offset: Option<u32>,
        limit: Option<u8>,
    ) -> Result<UserProfilePhotos> {
        let request = Request::new("getUserProfilePhotos")
            .text("user_id", user_id)
            .opt_text("offset", offset)
            .opt_text("limit", limit);
        self.call(request).await
    }

    /// Replace the bot's command menu
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails
    pub async fn set_my_commands(&self, commands: &[BotCommand]) -> Result<bool> {
        let request = Request::new("setMyCommands").json("commands", commands)?;
        self.call(request).await
    }

    /// Current command menu
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails
    pub async fn get_my_commands(&self) -> Result<Vec<BotCommand>> {
        self.call(Request::new("getMyCommands")).await
    }

    /// Log out from the cloud Bot API server
    ///
    /// The handler is closed afterwards; further calls fail with
    /// [`Error::NotSupported`].
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails
    pub async fn log_out(&self) -> Result<bool> {
        let done = self.call(Request::new("logOut")).await?;
        self.mark_closed();
        tracing::info!("logged out, bot handler closed");
        Ok(done)
    }

    /// Close the bot instance on a local Bot API server
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails
    pub async fn close(&self) -> Result<bool> {
        let done = self.call(Request::new("close")).await?;
        self.mark_closed();
        tracing::info!("bot instance closed");
        Ok(done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_updates_fields() {
        let request = GetUpdates {
            offset: Some(43),
            limit: Some(50),
            timeout: Some(Duration::from_secs(30)),
            allowed_updates: Some(vec![UpdateType::Message]),
        }
        .to_request()
        .unwrap();

        assert_eq!(request.method(), "getUpdates");
        assert_eq!(request.text_field("offset"), Some("43"));
        assert_eq!(request.text_field("limit"), Some("50"));
        assert_eq!(request.text_field("timeout"), Some("30"));
        assert_eq!(request.text_field("allowed_updates"), Some(r#"["message"]"#));
        assert_eq!(request.long_poll_wait(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn get_updates_defaults_send_nothing() {
        let request = GetUpdates::default().to_request().unwrap();
        assert!(request.fields().is_empty());
        assert_eq!(request.long_poll_wait(), None);
    }

    #[test]
    fn empty_allowed_updates_is_sent() {
        let request = GetUpdates {
            allowed_updates: Some(Vec::new()),
            ..GetUpdates::default()
        }
        .to_request()
        .unwrap();
        assert_eq!(request.text_field("allowed_updates"), Some("[]"));
    }

    #[test]
    fn limit_out_of_range() {
        for limit in [0, 101] {
            let err = GetUpdates {
                limit: Some(limit),
                ..GetUpdates::default()
            }
            .to_request()
            .unwrap_err();
            assert!(matches!(err, Error::InvalidParameter(_)), "limit {limit}");
        }
    }

    #[test]
    fn zero_timeout_is_not_a_long_poll() {
        let request = GetUpdates {
            timeout: Some(Duration::ZERO),
            ..GetUpdates::default()
        }
        .to_request()
        .unwrap();
        assert_eq!(request.text_field("timeout"), Some("0"));
        assert_eq!(request.long_poll_wait(), None);
    }

    #[test]
    fn send_options_fields() {
        let options = SendOptions {
            parse_mode: Some(ParseMode::MarkdownV2),
            disable_notification: true,
            reply_to_message_id: Some(7),
            reply_markup: None,
        };
        let request = options.apply(Request::new("sendMessage")).unwrap();
        assert_eq!(request.text_field("parse_mode"), Some("MarkdownV2"));
        assert_eq!(request.text_field("disable_notification"), Some("true"));
        assert_eq!(request.text_field("reply_to_message_id"), Some("7"));
        assert_eq!(request.text_field("reply_markup"), None);
    }

    #[test]
    fn chat_action_matches_serde() {
        let action = ChatAction::RecordVideoNote;
        assert_eq!(
            serde_json::to_value(action).unwrap(),
            serde_json::json!(action.as_str())
        );
    }
}
