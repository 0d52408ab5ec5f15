//! Telegram update handlers.
//!
//! Each handler converts the teloxide update into its `lpb-core` shape, takes a
//! concurrency permit and hands it to the core command router.

use std::sync::Arc;

use teloxide::{
    prelude::*,
    types::{CallbackQuery, Message},
};

use crate::router::AppState;

mod callback;
mod commands;

pub async fn handle_callback(q: CallbackQuery, state: Arc<AppState>) -> ResponseResult<()> {
    callback::handle_callback(q, state).await
}

pub async fn handle_message(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    // Only slash commands are handled; other chatter is ignored.
    match msg.text() {
        Some(text) if text.starts_with('/') => commands::handle_command(msg, state).await,
        _ => Ok(()),
    }
}
