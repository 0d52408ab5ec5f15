use std::sync::Arc;

use teloxide::{prelude::*, types::Message};
use tracing::{debug, error};

use lpb_core::{
    domain::{ChatId, MessageId, MessageRef, UserId},
    messaging::types::{Command, PhotoAttachment, RepliedMessage},
};

use crate::router::AppState;

fn parse_command(text: &str) -> (String, String) {
    // Telegram may send `/cmd@botname arg1 ...`
    let mut parts = text.trim().splitn(2, char::is_whitespace);
    let first = parts.next().unwrap_or("").trim();
    let rest = parts.next().unwrap_or("").trim().to_string();

    let cmd = first
        .trim_start_matches('/')
        .split('@')
        .next()
        .unwrap_or("")
        .to_lowercase();

    (cmd, rest)
}

fn replied_message(msg: &Message) -> Option<RepliedMessage> {
    let reply = msg.reply_to_message()?;
    // Telegram lists photo sizes smallest first.
    let photo = reply
        .photo()
        .and_then(|sizes| sizes.last())
        .map(|p| PhotoAttachment {
            file_id: p.file.id.clone(),
        });
    let text = reply
        .text()
        .or_else(|| reply.caption())
        .map(str::to_string);
    Some(RepliedMessage { text, photo })
}

pub(crate) fn to_command(msg: &Message) -> Option<Command> {
    let text = msg.text()?;
    let (name, args) = parse_command(text);
    if name.is_empty() {
        return None;
    }

    let chat_id = ChatId(msg.chat.id.0);
    Some(Command {
        chat_id,
        user_id: msg.from().map(|u| UserId(u.id.0 as i64)),
        message: MessageRef {
            chat_id,
            message_id: MessageId(msg.id.0),
        },
        name,
        args,
        reply_to: replied_message(msg),
    })
}

pub async fn handle_command(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(cmd) = to_command(&msg) else {
        return Ok(());
    };

    let Ok(_permit) = state.permits.clone().acquire_owned().await else {
        return Ok(());
    };

    debug!(command = %cmd.name, chat_id = cmd.chat_id.0, "handling command");
    if let Err(e) = state.router.handle_command(&cmd).await {
        error!(command = %cmd.name, error = %e, "command failed");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_command_strips_bot_mention_and_splits_args() {
        assert_eq!(
            parse_command("/GenPost@lpb_bot https://github.com/a/b"),
            ("genpost".to_string(), "https://github.com/a/b".to_string())
        );
    }

    #[test]
    fn parse_command_keeps_multiline_args() {
        let (cmd, rest) = parse_command("/post first line\nsecond line ");
        assert_eq!(cmd, "post");
        assert_eq!(rest, "first line\nsecond line");
    }

    #[test]
    fn parse_command_without_args() {
        assert_eq!(parse_command("/start"), ("start".to_string(), String::new()));
    }
}
