use async_trait::async_trait;

use crate::{
    domain::{ChatId, MessageRef},
    messaging::types::{ChatAction, InlineKeyboard},
    Result,
};

/// Chat transport port.
///
/// Telegram is the only implementation; the router drives every user-visible
/// side effect through it so routing rules can be tested with a fake.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    async fn reply_text(
        &self,
        to: MessageRef,
        text: &str,
        keyboard: Option<InlineKeyboard>,
    ) -> Result<MessageRef>;

    async fn edit_text(
        &self,
        msg: MessageRef,
        text: &str,
        keyboard: Option<InlineKeyboard>,
    ) -> Result<()>;

    async fn edit_keyboard(&self, msg: MessageRef, keyboard: InlineKeyboard) -> Result<()>;

    async fn send_chat_action(&self, chat_id: ChatId, action: ChatAction) -> Result<()>;

    async fn answer_callback_query(
        &self,
        callback_id: &str,
        text: Option<&str>,
        show_alert: bool,
    ) -> Result<()>;
}
