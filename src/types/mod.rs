//! Typed Bot API domain model
//!
//! Entities are created only by the decoder and never mutated afterwards.
//! Each one exclusively owns its children; dropping the root releases the
//! whole tree.

mod callback;
mod chat;
mod file;
mod location;
mod markup;
mod media;
mod member;
mod message;
mod poll;
mod response;
mod update;
mod user;
mod webhook;

pub use callback::{CallbackQuery, ChosenInlineResult, InlineQuery};
pub use chat::{Chat, ChatId, ChatLocation, ChatPermissions, ChatPhoto, ChatType};
pub use file::{File, UserProfilePhotos};
pub use location::{Contact, Dice, Location, Venue};
pub use markup::{BotCommand, InlineKeyboardButton, InlineKeyboardMarkup};
pub use media::{Animation, Audio, Document, MaskPosition, PhotoSize, Sticker, Video, VideoNote, Voice};
pub use member::{ChatInviteLink, ChatMember, ChatMemberUpdated};
pub use message::{Message, MessageEntity};
pub use poll::{Poll, PollAnswer, PollOption};
pub use response::ResponseParameters;
pub use update::{UPDATE_PRECEDENCE, Update, UpdateKind, UpdateType};
pub use user::User;
pub use webhook::WebhookInfo;
