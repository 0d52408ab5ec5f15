use std::fmt;

/// Telegram user id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UserId(pub i64);

/// Telegram chat id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

/// Telegram message id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageId(pub i32);

/// A stable reference to a Telegram message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageRef {
    pub chat_id: ChatId,
    pub message_id: MessageId,
}

/// Opaque draft identifier, embedded in button callback payloads.
///
/// Never contains the callback delimiter `.`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DraftId(pub String);

impl fmt::Display for DraftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Post identifier returned by the publishing backend (a URN).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PostId(pub String);

const FEED_UPDATE_URL: &str = "https://www.linkedin.com/feed/update/";

impl PostId {
    /// Public link to the published post.
    pub fn url(&self) -> String {
        format!("{FEED_UPDATE_URL}{}", self.0)
    }
}
