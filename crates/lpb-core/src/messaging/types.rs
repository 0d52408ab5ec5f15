use crate::domain::{ChatId, MessageRef, UserId};

/// A slash command addressed to the bot.
///
/// Telegram-specific fields live in the Telegram adapter; this carries only
/// what the router needs.
#[derive(Clone, Debug)]
pub struct Command {
    pub chat_id: ChatId,
    pub user_id: Option<UserId>,
    pub message: MessageRef,
    pub name: String,
    pub args: String,
    /// The message this command replies to, if any.
    pub reply_to: Option<RepliedMessage>,
}

/// Content of the message a command was sent in reply to.
#[derive(Clone, Debug, Default)]
pub struct RepliedMessage {
    pub text: Option<String>,
    pub photo: Option<PhotoAttachment>,
}

/// Transport-level reference to an image (the largest photo size).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PhotoAttachment {
    pub file_id: String,
}

#[derive(Clone, Debug)]
pub struct CallbackQuery {
    pub user_id: UserId,
    pub callback_id: String,
    pub data: String,
    /// The message carrying the pressed button; absent for inline-mode messages.
    pub message: Option<MessageRef>,
}

/// Outgoing "chat action" (typing indicator, etc).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChatAction {
    Typing,
    UploadPhoto,
}

/// Inline keyboard, one button per row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InlineKeyboard {
    pub buttons: Vec<InlineButton>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InlineButton {
    pub label: String,
    pub target: ButtonTarget,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ButtonTarget {
    Callback(String),
    Url(String),
}

impl InlineKeyboard {
    pub fn single(button: InlineButton) -> Self {
        Self {
            buttons: vec![button],
        }
    }
}

impl InlineButton {
    pub fn callback(label: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            target: ButtonTarget::Callback(data.into()),
        }
    }

    pub fn url(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            target: ButtonTarget::Url(url.into()),
        }
    }
}
