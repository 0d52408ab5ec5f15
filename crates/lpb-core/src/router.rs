//! Command Router: maps chat commands and button callbacks onto the controller.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::{
    domain::{DraftId, MessageRef},
    errors::Error,
    messaging::{
        callback::CallbackAction,
        port::MessagingPort,
        types::{CallbackQuery, ChatAction, Command},
    },
    workflow::DraftController,
    Result,
};

pub const EXPIRED: &str = "Expired";
const GENERATING: &str = "Generating post...";
const POSTED: &str = "Posted to LinkedIn";

pub struct CommandRouter {
    controller: Arc<DraftController>,
    messenger: Arc<dyn MessagingPort>,
    bot_name: String,
}

impl CommandRouter {
    pub fn new(
        controller: Arc<DraftController>,
        messenger: Arc<dyn MessagingPort>,
        bot_name: impl Into<String>,
    ) -> Self {
        Self {
            controller,
            messenger,
            bot_name: bot_name.into(),
        }
    }

    pub fn controller(&self) -> &Arc<DraftController> {
        &self.controller
    }

    /// Handle a slash command. Unknown commands are ignored.
    ///
    /// Errors returned here are the unexpected ones; expected failures are
    /// already reported to the chat.
    pub async fn handle_command(&self, cmd: &Command) -> Result<()> {
        match cmd.name.as_str() {
            "start" => self.reply(cmd.message, &self.greeting()).await,
            "help" => self.reply(cmd.message, &self.help()).await,
            "genpost" | "post" | "ai" => {
                if let Err(e) = self.controller.authorize(cmd.user_id) {
                    debug!(user_id = ?cmd.user_id, command = %cmd.name, "rejected non-owner");
                    return self.reply(cmd.message, &e.to_string()).await;
                }
                match cmd.name.as_str() {
                    "genpost" => self.genpost(cmd).await,
                    "post" => self.post(cmd).await,
                    _ => self.ai(cmd).await,
                }
            }
            other => {
                debug!(command = other, "ignoring unknown command");
                Ok(())
            }
        }
    }

    /// Handle an inline button press. The callback query is always answered.
    pub async fn handle_callback(&self, cb: &CallbackQuery) -> Result<()> {
        if self.controller.authorize(Some(cb.user_id)).is_err() {
            self.answer(cb, Some("Unauthorized"), false).await;
            return Ok(());
        }

        let (Some(action), Some(msg)) = (CallbackAction::parse(&cb.data), cb.message) else {
            debug!(data = %cb.data, "ignoring unrecognized callback");
            self.answer(cb, None, false).await;
            return Ok(());
        };

        match action {
            CallbackAction::Proceed(id) => self.proceed(cb, msg, &id).await,
            CallbackAction::Post(id) => self.publish(cb, msg, &id).await,
        }
    }

    fn greeting(&self) -> String {
        format!(
            "Hey there, I'm {}! I can help you post to LinkedIn and process text with Gemini AI.",
            self.bot_name
        )
    }

    fn help(&self) -> String {
        format!(
            "{}\n\nCommands:\n/genpost - Generate post\n/post - Post to LinkedIn\n/ai - Process text with Gemini AI",
            self.greeting()
        )
    }

    async fn genpost(&self, cmd: &Command) -> Result<()> {
        let photo = cmd.reply_to.as_ref().and_then(|r| r.photo.as_ref());
        match self.controller.seed(cmd.user_id, &cmd.args, photo).await {
            Ok(seeded) => {
                self.messenger
                    .reply_text(cmd.message, &seeded.prompt, Some(seeded.keyboard()))
                    .await?;
                Ok(())
            }
            Err(e @ (Error::Unauthorized | Error::MissingArgument(_))) => {
                self.reply(cmd.message, &e.to_string()).await
            }
            Err(e) => Err(e),
        }
    }

    async fn post(&self, cmd: &Command) -> Result<()> {
        let _ = self
            .messenger
            .send_chat_action(cmd.chat_id, ChatAction::UploadPhoto)
            .await;
        match self
            .controller
            .publish_direct(cmd.user_id, &cmd.args, cmd.reply_to.as_ref())
            .await
        {
            Ok(published) => {
                self.reply(cmd.message, &format!("{POSTED}: {}", published.url))
                    .await
            }
            Err(e @ (Error::Unauthorized | Error::MissingArgument(_))) => {
                self.reply(cmd.message, &e.to_string()).await
            }
            Err(e @ Error::DownloadFailed(_)) => Err(e),
            Err(e) => self.reply(cmd.message, &publish_failure_text(&e)).await,
        }
    }

    async fn ai(&self, cmd: &Command) -> Result<()> {
        let _ = self
            .messenger
            .send_chat_action(cmd.chat_id, ChatAction::Typing)
            .await;
        match self.controller.complete(cmd.user_id, &cmd.args).await {
            Ok(text) => self.reply(cmd.message, &text).await,
            Err(e @ (Error::Unauthorized | Error::MissingArgument(_))) => {
                self.reply(cmd.message, &e.to_string()).await
            }
            Err(e) => {
                self.reply(cmd.message, &format!("Failed to process text: {e}"))
                    .await
            }
        }
    }

    async fn proceed(&self, cb: &CallbackQuery, msg: MessageRef, id: &DraftId) -> Result<()> {
        if self.controller.drafts().get(id).is_none() {
            self.answer(cb, None, false).await;
            return self.messenger.edit_text(msg, EXPIRED, None).await;
        }

        self.answer(cb, Some(GENERATING), true).await;
        match self.controller.expand(id).await {
            Ok(expanded) => {
                self.messenger
                    .edit_text(msg, &expanded.text, Some(expanded.keyboard()))
                    .await
            }
            Err(Error::Expired) => self.messenger.edit_text(msg, EXPIRED, None).await,
            // The draft keeps its prompt and button, so the owner can press Proceed again.
            Err(e) => self.reply(msg, &format!("Failed to generate post: {e}")).await,
        }
    }

    async fn publish(&self, cb: &CallbackQuery, msg: MessageRef, id: &DraftId) -> Result<()> {
        match self.controller.publish(id).await {
            Ok(published) => {
                self.answer(cb, Some(POSTED), true).await;
                self.messenger
                    .edit_keyboard(msg, published.keyboard())
                    .await
            }
            Err(Error::Expired) => {
                self.answer(cb, None, false).await;
                self.messenger.edit_text(msg, EXPIRED, None).await
            }
            Err(e) => {
                self.answer(cb, None, false).await;
                self.messenger
                    .edit_text(msg, &publish_failure_text(&e), None)
                    .await
            }
        }
    }

    async fn reply(&self, to: MessageRef, text: &str) -> Result<()> {
        self.messenger.reply_text(to, text, None).await?;
        Ok(())
    }

    async fn answer(&self, cb: &CallbackQuery, text: Option<&str>, show_alert: bool) {
        if let Err(e) = self
            .messenger
            .answer_callback_query(&cb.callback_id, text, show_alert)
            .await
        {
            warn!(error = %e, "failed to answer callback query");
        }
    }
}

fn publish_failure_text(e: &Error) -> String {
    if e.is_image_upload_failure() {
        format!("Failed to upload image: {e}")
    } else {
        format!("Failed to post to LinkedIn: {e}")
    }
}
