//! Telegram adapter (teloxide).
//!
//! This crate implements the `lpb-core` MessagingPort and FileLocator over the
//! Telegram Bot API and runs the update dispatcher.

use async_trait::async_trait;

use teloxide::{
    prelude::*,
    types::{InlineKeyboardButton, InlineKeyboardMarkup},
};

pub mod handlers;
pub mod router;

use lpb_core::{
    domain::{ChatId, MessageId, MessageRef},
    errors::Error,
    messaging::{
        port::MessagingPort,
        types::{ButtonTarget, ChatAction, InlineKeyboard},
    },
    ports::FileLocator,
    Result,
};

#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    pub fn bot(&self) -> Bot {
        self.bot.clone()
    }

    fn tg_chat(chat_id: ChatId) -> teloxide::types::ChatId {
        teloxide::types::ChatId(chat_id.0)
    }

    fn tg_msg_id(message_id: MessageId) -> teloxide::types::MessageId {
        teloxide::types::MessageId(message_id.0)
    }

    fn map_err(e: teloxide::RequestError) -> Error {
        Error::External(format!("telegram error: {e}"))
    }

    fn markup(keyboard: InlineKeyboard) -> Result<InlineKeyboardMarkup> {
        let rows = keyboard
            .buttons
            .into_iter()
            .map(|b| {
                let button = match b.target {
                    ButtonTarget::Callback(data) => InlineKeyboardButton::callback(b.label, data),
                    ButtonTarget::Url(url) => {
                        let url = reqwest::Url::parse(&url)
                            .map_err(|e| Error::External(format!("invalid button url {url}: {e}")))?;
                        InlineKeyboardButton::url(b.label, url)
                    }
                };
                Ok(vec![button])
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(InlineKeyboardMarkup::new(rows))
    }
}

#[async_trait]
impl MessagingPort for TelegramMessenger {
    async fn reply_text(
        &self,
        to: MessageRef,
        text: &str,
        keyboard: Option<InlineKeyboard>,
    ) -> Result<MessageRef> {
        let mut req = self
            .bot
            .send_message(Self::tg_chat(to.chat_id), text.to_string())
            .reply_to_message_id(Self::tg_msg_id(to.message_id));
        if let Some(kb) = keyboard {
            req = req.reply_markup(Self::markup(kb)?);
        }
        let msg = req.await.map_err(Self::map_err)?;

        Ok(MessageRef {
            chat_id: to.chat_id,
            message_id: MessageId(msg.id.0),
        })
    }

    async fn edit_text(
        &self,
        msg: MessageRef,
        text: &str,
        keyboard: Option<InlineKeyboard>,
    ) -> Result<()> {
        let mut req = self.bot.edit_message_text(
            Self::tg_chat(msg.chat_id),
            Self::tg_msg_id(msg.message_id),
            text.to_string(),
        );
        if let Some(kb) = keyboard {
            req = req.reply_markup(Self::markup(kb)?);
        }
        req.await.map_err(Self::map_err)?;
        Ok(())
    }

    async fn edit_keyboard(&self, msg: MessageRef, keyboard: InlineKeyboard) -> Result<()> {
        self.bot
            .edit_message_reply_markup(Self::tg_chat(msg.chat_id), Self::tg_msg_id(msg.message_id))
            .reply_markup(Self::markup(keyboard)?)
            .await
            .map_err(Self::map_err)?;
        Ok(())
    }

    async fn send_chat_action(&self, chat_id: ChatId, action: ChatAction) -> Result<()> {
        let tg_action = match action {
            ChatAction::Typing => teloxide::types::ChatAction::Typing,
            ChatAction::UploadPhoto => teloxide::types::ChatAction::UploadPhoto,
        };
        self.bot
            .send_chat_action(Self::tg_chat(chat_id), tg_action)
            .await
            .map_err(Self::map_err)?;
        Ok(())
    }

    async fn answer_callback_query(
        &self,
        callback_id: &str,
        text: Option<&str>,
        show_alert: bool,
    ) -> Result<()> {
        let mut req = self.bot.answer_callback_query(callback_id.to_string());
        if let Some(t) = text {
            req = req.text(t.to_string()).show_alert(show_alert);
        }
        req.await.map_err(Self::map_err)?;
        Ok(())
    }
}

#[async_trait]
impl FileLocator for TelegramMessenger {
    async fn download_url(&self, file_id: &str) -> Result<String> {
        let file = self
            .bot
            .get_file(file_id.to_string())
            .await
            .map_err(|e| Error::DownloadFailed(format!("telegram getFile failed: {e}")))?;

        let url = self
            .bot
            .api_url()
            .join(&format!("file/bot{}/{}", self.bot.token(), file.path))
            .map_err(|e| Error::DownloadFailed(format!("invalid file url: {e}")))?;
        Ok(url.to_string())
    }
}
